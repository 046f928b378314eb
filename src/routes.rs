use crate::{
    api::{admin, attendance, category, employee},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Admin surface. Login and registration are public; everything in the
    // inner scope passes the authorization gate first, then a per-handler
    // role check.
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/register_admin")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register_admin)),
            )
            .service(
                web::resource("/adminlogin")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::admin_login)),
            )
            .service(web::resource("/logout").route(web::get().to(handlers::logout)))
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware))
                    // authentication
                    .wrap(protected_limiter.clone()) // rate limiting
                    .service(
                        web::resource("/add_category")
                            .route(web::post().to(category::add_category)),
                    )
                    .service(
                        web::resource("/category").route(web::get().to(category::list_categories)),
                    )
                    .service(
                        web::resource("/add_employee")
                            .route(web::post().to(employee::add_employee)),
                    )
                    .service(
                        web::resource("/employee").route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/employee/{id}")
                            .route(web::get().to(employee::get_employee)),
                    )
                    .service(
                        web::resource("/edit_employee/{id}")
                            .route(web::put().to(employee::edit_employee)),
                    )
                    .service(
                        web::resource("/delete_employee/{id}")
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    .service(
                        web::resource("/admin_count").route(web::get().to(admin::admin_count)),
                    )
                    .service(
                        web::resource("/employee_count")
                            .route(web::get().to(admin::employee_count)),
                    )
                    .service(
                        web::resource("/salary_count").route(web::get().to(admin::salary_count)),
                    )
                    .service(
                        web::resource("/admin_records").route(web::get().to(admin::admin_records)),
                    )
                    .service(
                        web::resource("/edit_admin/{id}")
                            .route(web::put().to(admin::edit_admin)),
                    ),
            ),
    );

    // Employee surface: public login/logout, gated attendance and detail.
    cfg.service(
        web::scope("/employee")
            .service(
                web::resource("/employeelogin")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::employee_login)),
            )
            .service(web::resource("/logout").route(web::get().to(handlers::logout)))
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter)
                    .service(
                        web::resource("/detail/{id}")
                            .route(web::get().to(employee::employee_detail)),
                    )
                    .service(
                        web::resource("/employee_is_clocked_in/{id}")
                            .route(web::get().to(attendance::is_clocked_in)),
                    )
                    .service(
                        web::resource("/employee_clockin/{id}")
                            .route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/employee_clockout/{id}")
                            .route(web::post().to(attendance::clock_out)),
                    )
                    .service(
                        web::resource("/calendar/{employee_id}")
                            .route(web::get().to(attendance::calendar)),
                    ),
            ),
    );

    // Session probe; the extractor does the gating here
    cfg.service(web::resource("/verify").route(web::get().to(handlers::verify)));
}

// LOGIN
//  └─ session token (24 h), HTTP-only cookie `jwt`
//
// API REQUEST
//  └─ cookie `jwt` (or Authorization: Bearer fallback)
//
// LOGOUT
//  └─ clears the cookie; the token simply ages out server-side
