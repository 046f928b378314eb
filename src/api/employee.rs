use crate::{
    auth::{auth::AuthUser, password::hash_password},
    error::ApiError,
    model::employee::Employee,
    utils::db_utils::{build_update_sql, execute_update},
    utils::{email_cache, email_filter},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

const EMPLOYEE_SELECT: &str = r#"
    SELECT e.id, e.name, e.email, e.address, e.salary, e.image,
           e.category_id, c.name AS category_name
    FROM employees e
    LEFT JOIN categories c ON c.id = e.category_id
"#;

/// Columns an admin may touch through the edit endpoint. Credentials are
/// excluded on purpose.
const EMPLOYEE_EDIT_COLS: &[&str] = &["name", "email", "salary", "address", "category_id", "image"];

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Alice Doe")]
    pub name: String,
    #[schema(example = "alice@company.com", format = "email", value_type = String)]
    pub email: String,
    pub password: String,
    #[schema(example = "12 Main St", nullable = true)]
    pub address: Option<String>,
    #[schema(example = 52000, nullable = true)]
    pub salary: Option<i64>,
    /// File name of an already-uploaded image; the upload itself is handled
    /// outside this service.
    #[schema(example = "image_1700000000.png", nullable = true)]
    pub image: Option<String>,
    #[schema(example = 3)]
    pub category_id: u64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/auth/add_employee",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee added", body = Object, example = json!({
            "success": true, "message": "Employee added successfully"
        })),
        (status = 400, description = "Unknown category"),
        (status = 409, description = "Employee with this email already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn add_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let email = payload.email.trim().to_lowercase();
    if payload.name.trim().is_empty() || email.is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Name, email and password must not be empty"
        })));
    }

    if !crate::auth::handlers::is_email_available("employee", &email, pool.get_ref()).await {
        return Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Employee with this email already exists"
        })));
    }

    // Same one-way hash as admin credentials.
    let hashed = hash_password(&payload.password);

    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, email, password, address, salary, image, category_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.name.trim())
    .bind(&email)
    .bind(&hashed)
    .bind(&payload.address)
    .bind(payload.salary)
    .bind(&payload.image)
    .bind(payload.category_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            email_filter::insert("employee", &email);
            email_cache::mark_taken("employee", &email).await;

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Employee added successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "success": false,
                        "message": "Employee with this email already exists"
                    })));
                }
                if db_err.is_foreign_key_violation() {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "success": false,
                        "message": "Unknown category"
                    })));
                }
            }

            error!(error = %e, "Failed to add employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to add employee"
            })))
        }
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/auth/employee",
    responses(
        (status = 200, description = "All employees with their category", body = Object),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employees = sqlx::query_as::<_, Employee>(EMPLOYEE_SELECT)
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employees": employees
    })))
}

/// Get Employee by ID (admin view)
#[utoipa::path(
    get,
    path = "/auth/employee/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    fetch_employee(pool.get_ref(), employee_id).await
}

/// Employee self view. Reachable by the employee's own session or an admin.
#[utoipa::path(
    get,
    path = "/employee/detail/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn employee_detail(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    fetch_employee(pool.get_ref(), employee_id).await
}

async fn fetch_employee(pool: &MySqlPool, employee_id: u64) -> actix_web::Result<HttpResponse> {
    let sql = format!("{} WHERE e.id = ?", EMPLOYEE_SELECT);

    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            ApiError::Storage
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "result": emp
        }))),
        None => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Employee not found"
        }))),
    }
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/auth/edit_employee/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "success": true, "message": "Employee updated successfully"
        })),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn edit_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    let update = build_update_sql("employees", &body, EMPLOYEE_EDIT_COLS, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(ApiError::from)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/auth/delete_employee/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "success": true, "message": "Employee deleted"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    // Grab the email first so the availability fast-path stays honest.
    let email = sqlx::query_scalar::<_, String>("SELECT email FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "success": false,
                    "message": "Employee not found"
                })));
            }

            if let Some(email) = email {
                email_filter::remove("employee", &email);
                email_cache::mark_free("employee", &email).await;
            }

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Employee deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Internal Server Error"
            })))
        }
    }
}
