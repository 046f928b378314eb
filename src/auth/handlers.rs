use crate::{
    auth::{
        auth::AuthUser,
        jwt::generate_session_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    model::role::Role,
    models::{LoginReqDto, RegisterAdminReq, CredentialSql},
};
use actix_web::{
    HttpResponse, Responder,
    cookie::{Cookie, SameSite, time::Duration as CookieDuration},
    web,
};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::utils::email_cache;
use crate::utils::email_filter;

// auth end points

fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build("jwt", token)
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(config.session_ttl as i64))
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build("jwt", "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// true  => email AVAILABLE in the given collection
/// false => email TAKEN
pub async fn is_email_available(scope: &str, email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1️⃣ Cuckoo filter — fast negative
    if !email_filter::might_exist(scope, &email) {
        return true;
    }

    // 2️⃣ Moka cache — fast positive
    if email_cache::is_taken(scope, &email).await {
        return false;
    }

    // 3️⃣ Database fallback
    let sql = match scope {
        "admin" => "SELECT EXISTS(SELECT 1 FROM admins WHERE email = ? LIMIT 1)",
        _ => "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)",
    };

    let exists = sqlx::query_scalar::<_, bool>(sql)
        .bind(&email)
        .fetch_one(pool)
        .await
        .unwrap_or(true); // fail-safe

    !exists
}

/// Admin registration handler
#[utoipa::path(
    post,
    path = "/auth/register_admin",
    request_body = RegisterAdminReq,
    responses(
        (status = 201, description = "Admin registered", body = Object, example = json!({
            "success": true, "message": "Admin registered successfully"
        })),
        (status = 409, description = "Admin with this email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register_admin(
    body: web::Json<RegisterAdminReq>,
    pool: web::Data<MySqlPool>,
) -> impl Responder {
    let email = body.email.trim().to_lowercase();
    let password = &body.password;

    if email.is_empty() || password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Email and password must not be empty"
        }));
    }

    if !is_email_available("admin", &email, pool.get_ref()).await {
        return HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Admin with this email already exists"
        }));
    }

    let hashed = hash_password(password);

    let result = sqlx::query("INSERT INTO admins (email, password) VALUES (?, ?)")
        .bind(&email)
        .bind(&hashed)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            // keep the filter and cache in sync with the insert
            email_filter::insert("admin", &email);
            email_cache::mark_taken("admin", &email).await;

            HttpResponse::Created().json(json!({
                "success": true,
                "message": "Admin registered successfully"
            }))
        }
        Err(e) => {
            // the unique key is the authority; the filter check above can race
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return HttpResponse::Conflict().json(json!({
                        "success": false,
                        "message": "Admin with this email already exists"
                    }));
                }
            }

            error!(error = %e, "Failed to register admin");
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register admin"
            }))
        }
    }
}

async fn fetch_credential(
    table: &str,
    email: &str,
    pool: &MySqlPool,
) -> Result<Option<CredentialSql>, sqlx::Error> {
    let sql = match table {
        "admins" => "SELECT id, email, password FROM admins WHERE email = ?",
        _ => "SELECT id, email, password FROM employees WHERE email = ?",
    };

    sqlx::query_as::<_, CredentialSql>(sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Admin login handler
#[utoipa::path(
    post,
    path = "/auth/adminlogin",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in, session cookie set"),
        (status = 401, description = "Incorrect email or password"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "admin_login", skip(pool, config, body), fields(email = %body.email))]
pub async fn admin_login(
    body: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Admin login request received");

    let user = match fetch_credential("admins", &body.email, pool.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Login failed: admin not found");
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "User not found"
            }));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching admin");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if verify_password(&body.password, &user.password).is_err() {
        info!("Login failed: password mismatch");
        return HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Incorrect email or password"
        }));
    }

    debug!(admin_id = user.id, "Password verified, issuing session token");

    let token = generate_session_token(
        user.id,
        user.email,
        Role::Admin as u8,
        &config.jwt_secret,
        config.session_ttl,
    );

    info!("Admin login successful");

    HttpResponse::Ok()
        .cookie(session_cookie(token, &config))
        .json(json!({
            "success": true,
            "message": "You are logged in"
        }))
}

/// Employee login handler
#[utoipa::path(
    post,
    path = "/employee/employeelogin",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in, session cookie set; body carries the employee id"),
        (status = 401, description = "Incorrect email or password"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "employee_login", skip(pool, config, body), fields(email = %body.email))]
pub async fn employee_login(
    body: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Employee login request received");

    let user = match fetch_credential("employees", &body.email, pool.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Login failed: employee not found");
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "User not found"
            }));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching employee");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // Employee credentials are argon2-hashed exactly like admin ones.
    if verify_password(&body.password, &user.password).is_err() {
        info!("Login failed: password mismatch");
        return HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Incorrect email or password"
        }));
    }

    let employee_id = user.id;
    let token = generate_session_token(
        user.id,
        user.email,
        Role::Employee as u8,
        &config.jwt_secret,
        config.session_ttl,
    );

    info!("Employee login successful");

    HttpResponse::Ok()
        .cookie(session_cookie(token, &config))
        .json(json!({
            "success": true,
            "message": "You are logged in",
            "id": employee_id
        }))
}

/// Logout: clearing the cookie is the whole operation. Tokens stay valid
/// until natural expiry; the server keeps no revocation state.
#[utoipa::path(
    get,
    path = "/auth/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({"success": true}))
}

/// Session verification for the frontend bootstrap
#[utoipa::path(
    get,
    path = "/verify",
    responses(
        (status = 200, description = "Session is valid", body = Object, example = json!({
            "success": true, "role": "employee", "id": 7
        })),
        (status = 401, description = "No session token supplied"),
        (status = 403, description = "Invalid or expired token")
    ),
    security(("cookie_auth" = [])),
    tag = "Auth"
)]
pub async fn verify(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "role": auth.role.as_str(),
        "id": auth.id
    }))
}
