pub mod admin;
pub mod advisor;
pub mod auth;
pub mod bmi;
pub mod checkout;
pub mod health;
pub mod me;
pub mod metrics;
pub mod products;
pub mod swagger;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::{error, web};

use crate::middleware::{AdminMiddleware, AuthMiddleware};
use crate::utils::AppError;

/// Malformed bodies are answered in the `{ok: false, message}` envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            log::debug!("Rejected JSON body: {}", err);
            let message = match &err {
                error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
                other => format!("Invalid JSON body: {}", other),
            };
            AppError::Validation(message).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid query: {}", err)).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid path: {}", err)).into())
}

/// Registers every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Public auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/signup", web::post().to(auth::signup))
                .route("/login", web::post().to(auth::login))
                .route("/refresh", web::post().to(auth::refresh))
                .route("/logout", web::post().to(auth::logout))
                .route("/sync-user", web::post().to(auth::sync_user))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::me)),
                ),
        )
        // Catalog (public)
        .service(
            web::scope("/api/products")
                .route("", web::get().to(products::list_products))
                .route("/{id}", web::get().to(products::get_product)),
        )
        .route("/api/bmi/calculate", web::post().to(bmi::calculate))
        // Signed-in user
        .service(
            web::scope("/api/me")
                .wrap(AuthMiddleware)
                .route("/fitness-metrics", web::put().to(me::update_fitness_metrics))
                .route("/goals", web::put().to(me::update_goals))
                .route("/feedback", web::post().to(me::record_feedback)),
        )
        .service(
            web::resource("/api/recommendations")
                .wrap(AuthMiddleware)
                .route(web::get().to(advisor::recommendations)),
        )
        .service(
            web::resource("/api/insights")
                .wrap(AuthMiddleware)
                .route(web::get().to(advisor::insights)),
        )
        .service(
            web::resource("/api/advisor/ask")
                .wrap(AuthMiddleware)
                .route(web::post().to(advisor::ask)),
        )
        .service(
            web::scope("/api/checkout")
                .wrap(AuthMiddleware)
                .route("/quote", web::post().to(checkout::quote))
                .route("/promo", web::post().to(checkout::validate_promo))
                .route("/orders", web::post().to(checkout::place_order))
                .route("/orders", web::get().to(checkout::list_my_orders)),
        )
        // Admin dashboard: AuthMiddleware runs first, then the admin guard
        .service(
            web::scope("/api/admin")
                .wrap(AdminMiddleware)
                .wrap(AuthMiddleware)
                .route("/users", web::get().to(admin::list_users))
                .route("/users/{id}/notes", web::patch().to(admin::update_user_note))
                .route("/orders", web::get().to(admin::list_orders))
                .route("/orders/{id}/status", web::patch().to(admin::update_order_status))
                .route("/promotions", web::get().to(admin::list_promotions))
                .route("/promotions", web::post().to(admin::create_promotion))
                .route("/analytics", web::get().to(admin::get_analytics)),
        );
}
