use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::clock_record::WorkMode;

#[derive(Deserialize, ToSchema)]
pub struct RegisterAdminReq {
    #[schema(example = "admin@company.com", format = "email", value_type = String)]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "alice@company.com", format = "email", value_type = String)]
    pub email: String,
    pub password: String,
}

/// Credential row fetched at login. Never serialized.
#[derive(FromRow)]
pub struct CredentialSql {
    pub id: u64,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ClockInReq {
    #[schema(example = "HQ", value_type = String, nullable = true)]
    pub location: Option<String>,
    #[serde(default, alias = "workFromType")]
    pub work_from_type: Option<WorkMode>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: u64,
    /// Email of the authenticated identity.
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,
}
