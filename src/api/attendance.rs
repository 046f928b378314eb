use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::clock_record::{ClockRecord, build_calendar};
use crate::models::ClockInReq;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

/// Clock-in status
#[utoipa::path(
    get,
    path = "/employee/employee_is_clocked_in/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Current status", body = Object, example = json!({
            "clockedIn": true
        })),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Attendance"
)]
pub async fn is_clocked_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let clocked_in = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM clock_records WHERE employee_id = ? AND clock_out IS NULL)",
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "clockedIn": clocked_in })))
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/employee/employee_clockin/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = ClockInReq,
    responses(
        (status = 200, description = "Clocked in", body = Object, example = json!({
            "status": "success"
        })),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "Already clocked in"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<ClockInReq>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let work_mode = body.work_from_type.unwrap_or_default();
    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        r#"
        INSERT INTO clock_records (employee_id, clock_in, clock_out, location, work_from_type)
        VALUES (?, ?, NULL, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(now)
    .bind(&body.location)
    .bind(work_mode.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "status": "success" }))),

        Err(e) => {
            // uq_open_session: a concurrent or repeated clock-in loses here,
            // no matter what any earlier status read said.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Err(ApiError::AlreadyClockedIn.into());
                }
                if db_err.is_foreign_key_violation() {
                    return Err(ApiError::NotFound.into());
                }
            }

            error!(error = %e, employee_id, "Clock-in failed");
            Err(ApiError::Storage.into())
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/employee/employee_clockout/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Clocked out", body = Object, example = json!({
            "success": true
        })),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No open clock-in record"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let now = Utc::now().naive_utc();

    // Oldest open record first, should legacy data ever hold more than one.
    let result = sqlx::query(
        r#"
        UPDATE clock_records
        SET clock_out = ?
        WHERE employee_id = ?
        AND clock_out IS NULL
        ORDER BY clock_in ASC
        LIMIT 1
        "#,
    )
    .bind(now)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Clock-out failed");
        ApiError::Storage
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoOpenSession.into());
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Attendance calendar: every record for the employee, newest first, with
/// the calendar date and weekday derived from the UTC clock-in time.
#[utoipa::path(
    get,
    path = "/employee/calendar/{employeeId}",
    params(
        ("employeeId", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Calendar data", body = Object, example = json!({
            "success": true,
            "calendarData": [{
                "date": "2026-03-02",
                "dayName": "Monday",
                "clockIn": "2026-03-02T09:00:00",
                "clockOut": "2026-03-02T17:30:00",
                "location": "HQ",
                "workFromType": "office"
            }]
        })),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("cookie_auth" = [])),
    tag = "Attendance"
)]
pub async fn calendar(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let records = sqlx::query_as::<_, ClockRecord>(
        r#"
        SELECT id, employee_id, clock_in, clock_out, location, work_from_type
        FROM clock_records
        WHERE employee_id = ?
        ORDER BY clock_in DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "calendarData": build_calendar(records)
    })))
}

// Invariant tests against a live MySQL instance. Run with
//   DATABASE_URL=mysql://... cargo test -- --ignored
// after applying schema.sql.
#[cfg(test)]
mod db_tests {
    use chrono::Utc;
    use sqlx::MySqlPool;

    async fn pool() -> MySqlPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        MySqlPool::connect(&url).await.expect("connect")
    }

    async fn seed_employee(pool: &MySqlPool) -> u64 {
        let tag = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(format!("test-{}", tag))
            .execute(pool)
            .await
            .expect("insert category");

        let category_id = sqlx::query_scalar::<_, u64>("SELECT LAST_INSERT_ID()")
            .fetch_one(pool)
            .await
            .expect("category id");

        sqlx::query(
            "INSERT INTO employees (name, email, password, category_id) VALUES (?, ?, ?, ?)",
        )
        .bind("Test Employee")
        .bind(format!("{}@test.local", tag))
        .bind("irrelevant-hash")
        .bind(category_id)
        .execute(pool)
        .await
        .expect("insert employee");

        sqlx::query_scalar::<_, u64>("SELECT LAST_INSERT_ID()")
            .fetch_one(pool)
            .await
            .expect("employee id")
    }

    async fn open_session(pool: &MySqlPool, employee_id: u64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO clock_records (employee_id, clock_in, clock_out) VALUES (?, ?, NULL)",
        )
        .bind(employee_id)
        .bind(Utc::now().naive_utc())
        .execute(pool)
        .await
        .map(|_| ())
    }

    async fn close_session(pool: &MySqlPool, employee_id: u64) -> u64 {
        sqlx::query(
            r#"
            UPDATE clock_records
            SET clock_out = ?
            WHERE employee_id = ? AND clock_out IS NULL
            ORDER BY clock_in ASC
            LIMIT 1
            "#,
        )
        .bind(Utc::now().naive_utc())
        .bind(employee_id)
        .execute(pool)
        .await
        .expect("clock out")
        .rows_affected()
    }

    async fn open_count(pool: &MySqlPool, employee_id: u64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM clock_records WHERE employee_id = ? AND clock_out IS NULL",
        )
        .bind(employee_id)
        .fetch_one(pool)
        .await
        .expect("count")
    }

    #[actix_web::test]
    #[ignore = "needs a MySQL instance with schema.sql applied"]
    async fn store_admits_at_most_one_open_session() {
        let pool = pool().await;
        let employee_id = seed_employee(&pool).await;

        open_session(&pool, employee_id).await.expect("first clock-in");

        let second = open_session(&pool, employee_id).await;
        match second {
            Err(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {:?}", other),
        }

        assert_eq!(open_count(&pool, employee_id).await, 1);

        // After closing, a new session may open again.
        assert_eq!(close_session(&pool, employee_id).await, 1);
        assert_eq!(open_count(&pool, employee_id).await, 0);
        open_session(&pool, employee_id).await.expect("re-open after close");
        assert_eq!(close_session(&pool, employee_id).await, 1);
    }

    #[actix_web::test]
    #[ignore = "needs a MySQL instance with schema.sql applied"]
    async fn clock_out_with_nothing_open_affects_no_rows() {
        let pool = pool().await;
        let employee_id = seed_employee(&pool).await;

        assert_eq!(close_session(&pool, employee_id).await, 0);
        assert_eq!(open_count(&pool, employee_id).await, 0);
    }
}
