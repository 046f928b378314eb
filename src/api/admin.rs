use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::admin::Admin,
    utils::{email_cache, email_filter},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

/// Admin count
#[utoipa::path(
    get,
    path = "/auth/admin_count",
    responses(
        (status = 200, description = "Number of administrators", body = Object, example = json!({
            "success": true, "result": 2
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_count(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "result": count })))
}

/// Employee count
#[utoipa::path(
    get,
    path = "/auth/employee_count",
    responses(
        (status = 200, description = "Number of employees", body = Object, example = json!({
            "success": true, "result": 42
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn employee_count(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "result": count })))
}

/// Total salary across all employees
#[utoipa::path(
    get,
    path = "/auth/salary_count",
    responses(
        (status = 200, description = "Salary sum", body = Object, example = json!({
            "success": true, "result": 1250000
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn salary_count(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // SUM over BIGINT yields DECIMAL in MySQL; cast back down.
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT CAST(COALESCE(SUM(salary), 0) AS SIGNED) FROM employees",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "result": total })))
}

/// List admins. Ids and emails only; hashes never leave the login queries.
#[utoipa::path(
    get,
    path = "/auth/admin_records",
    responses(
        (status = 200, description = "All administrators", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let admins = sqlx::query_as::<_, Admin>("SELECT id, email FROM admins ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "result": admins })))
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAdmin {
    #[schema(example = "new.admin@company.com", format = "email", value_type = String)]
    pub email: String,
}

/// Update an admin's email
#[utoipa::path(
    put,
    path = "/auth/edit_admin/{id}",
    params(
        ("id", Path, description = "Admin ID")
    ),
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Admin updated", body = Object, example = json!({
            "success": true, "message": "Admin updated successfully"
        })),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn edit_admin(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateAdmin>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let admin_id = path.into_inner();
    let new_email = body.email.trim().to_lowercase();

    if new_email.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Email must not be empty"
        })));
    }

    let old_email = sqlx::query_scalar::<_, String>("SELECT email FROM admins WHERE id = ?")
        .bind(admin_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    let Some(old_email) = old_email else {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Admin not found"
        })));
    };

    let result = sqlx::query("UPDATE admins SET email = ? WHERE id = ?")
        .bind(&new_email)
        .bind(admin_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            email_filter::remove("admin", &old_email);
            email_cache::mark_free("admin", &old_email).await;
            email_filter::insert("admin", &new_email);
            email_cache::mark_taken("admin", &new_email).await;

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Admin updated successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "success": false,
                        "message": "Email already in use"
                    })));
                }
            }

            error!(error = %e, admin_id, "Failed to update admin");
            Err(ApiError::Storage.into())
        }
    }
}
