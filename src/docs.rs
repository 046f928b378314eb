use crate::api::admin::UpdateAdmin;
use crate::api::category::CreateCategory;
use crate::api::employee::CreateEmployee;
use crate::model::admin::Admin;
use crate::model::category::Category;
use crate::model::clock_record::{CalendarEntry, ClockRecord, WorkMode};
use crate::model::employee::Employee;
use crate::models::{ClockInReq, LoginReqDto, RegisterAdminReq};
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("jwt"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staffdesk API",
        version = "1.0.0",
        description = r#"
## Employee Management Backend

Administrators manage employee records and categories and review attendance;
employees sign in and log clock-in/clock-out events with location and
work-mode metadata.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance Tracking**
  - Clock-in/clock-out sessions with location and work mode
  - Per-employee attendance calendar
- **Categories & Dashboards**
  - Employee categories, headcounts and salary totals

### 🔐 Security
Sessions are stateless JWTs carried in an HTTP-only `jwt` cookie.
Admin-only operations additionally require the **admin** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register_admin,
        crate::auth::handlers::admin_login,
        crate::auth::handlers::employee_login,
        crate::auth::handlers::logout,
        crate::auth::handlers::verify,

        crate::api::attendance::is_clocked_in,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::calendar,

        crate::api::employee::add_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::employee_detail,
        crate::api::employee::edit_employee,
        crate::api::employee::delete_employee,

        crate::api::admin::admin_count,
        crate::api::admin::employee_count,
        crate::api::admin::salary_count,
        crate::api::admin::admin_records,
        crate::api::admin::edit_admin,

        crate::api::category::add_category,
        crate::api::category::list_categories
    ),
    components(
        schemas(
            Admin,
            Category,
            ClockRecord,
            CalendarEntry,
            WorkMode,
            Employee,
            ClockInReq,
            LoginReqDto,
            RegisterAdminReq,
            CreateEmployee,
            UpdateAdmin,
            CreateCategory
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, logout and session verification"),
        (name = "Attendance", description = "Clock-in/clock-out tracking APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Admin", description = "Admin records and dashboard counts"),
        (name = "Category", description = "Employee category APIs"),
    )
)]
pub struct ApiDoc;
