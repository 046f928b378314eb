use crate::{auth::auth::AuthUser, error::ApiError, model::category::Category};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateCategory {
    #[schema(example = "Engineering")]
    pub name: String,
}

/// Add Category
#[utoipa::path(
    post,
    path = "/auth/add_category",
    request_body = CreateCategory,
    responses(
        (status = 200, description = "Category added", body = Object, example = json!({
            "success": true, "message": "Category added successfully"
        })),
        (status = 400, description = "Empty name"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Category"
)]
pub async fn add_category(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<CreateCategory>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let name = body.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Category name must not be empty"
        })));
    }

    sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(name)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to add category");
            ApiError::Storage
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category added successfully"
    })))
}

/// List Categories
#[utoipa::path(
    get,
    path = "/auth/category",
    responses(
        (status = 200, description = "All categories", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Category"
)]
pub async fn list_categories(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "categories": categories
    })))
}
