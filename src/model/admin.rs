use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrator record as exposed over the API. The password hash never
/// leaves the credential queries in `auth::handlers`.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Admin {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "admin@company.com")]
    pub email: String,
}
