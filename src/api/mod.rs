pub mod admin;
pub mod body;
pub mod health;
pub mod items;
pub mod reviews;
pub mod swagger;
pub mod users;

use actix_web::{error::InternalError, web, HttpResponse};
use std::sync::Arc;

use crate::middleware::{AuthMiddleware, TokenVerifier};
use crate::utils::AppError;

/// Maps a service error to the HTTP reply.
///
/// Client errors keep their message; internal failures are logged and
/// answered with the route's generic `failure` text only.
pub fn error_response(err: AppError, failure: &str) -> HttpResponse {
    if !err.is_client_error() {
        log::error!("❌ {}: {}", failure, err);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": failure }));
    }

    log::warn!("⚠️ {}", err);
    match err {
        AppError::BadRequest(msg) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
        }
        AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({ "error": msg })),
        AppError::Forbidden(msg) => {
            HttpResponse::Forbidden().json(serde_json::json!({ "error": msg }))
        }
        _ => HttpResponse::InternalServerError().json(serde_json::json!({ "error": failure })),
    }
}

/// Registers every user route. Token-protected routes get their own
/// `AuthMiddleware`.
pub fn configure(cfg: &mut web::ServiceConfig, verifier: Arc<TokenVerifier>) {
    let guarded = || AuthMiddleware::new(verifier.clone());

    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("⚠️ Invalid JSON body on {}: {}", req.path(), err);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid request body" })),
        )
        .into()
    }))
    .route("/health", web::get().to(health::health_check))
    // ==================== USERS ====================
    .route("/add-user-data", web::post().to(users::add_user))
    .route("/add-google-user-data", web::post().to(users::add_google_user))
    .route("/get-all-users", web::get().to(users::get_all_users))
    .route("/get-user/{email}", web::get().to(users::get_user))
    .route("/search-users", web::get().to(users::search_users))
    .route("/update-plan/{email}", web::patch().to(users::update_plan))
    // ==================== PAYMENT HISTORY ====================
    .service(
        web::resource("/add-payment-history/{email}")
            .wrap(guarded())
            .route(web::post().to(items::add_payment_history)),
    )
    .service(
        web::resource("/get-payment-history/{email}")
            .wrap(guarded())
            .route(web::get().to(items::get_payment_history)),
    )
    // ==================== REVIEWS ====================
    .service(
        web::resource("/get-review/{email}")
            .wrap(guarded())
            .route(web::get().to(reviews::get_review)),
    )
    .service(
        web::resource("/edit-review/{email}/{review_id}")
            .wrap(guarded())
            .route(web::patch().to(reviews::edit_review)),
    )
    .service(
        web::resource("/delete-review/{email}/{review_id}")
            .wrap(guarded())
            .route(web::delete().to(reviews::delete_review)),
    )
    // ==================== ADMIN ====================
    .service(
        web::resource("/make-admin/{id}")
            .wrap(guarded())
            .route(web::patch().to(admin::make_admin)),
    )
    .route("/check-admin/{email}", web::get().to(admin::check_admin))
    .service(
        web::resource("/delete-user/{id}")
            .wrap(guarded())
            .route(web::delete().to(admin::delete_user)),
    )
    // ==================== MEALS / SCHOLARSHIPS / APPLICATIONS ====================
    .service(
        web::resource("/insert-liked-meals/{email}")
            .wrap(guarded())
            .route(web::post().to(items::insert_liked_meals)),
    )
    .service(
        web::resource("/get-liked-meals/{email}")
            .wrap(guarded())
            .route(web::get().to(items::get_liked_meals)),
    )
    .service(
        web::resource("/insert-reviewed-scholarships/{email}")
            .wrap(guarded())
            .route(web::post().to(items::insert_reviewed_scholarships)),
    )
    .service(
        web::resource("/get-reviewed-scholarships/{email}")
            .wrap(guarded())
            .route(web::get().to(items::get_reviewed_scholarships)),
    )
    .service(
        web::resource("/insert-user-application/{email}")
            .wrap(guarded())
            .route(web::post().to(items::insert_user_application)),
    )
    .service(
        web::resource("/get-my-application/{email}")
            .wrap(guarded())
            .route(web::get().to(items::get_my_application)),
    )
    .service(
        web::resource("/insert-requested-meals/{email}")
            .wrap(guarded())
            .route(web::post().to(items::insert_requested_meals)),
    )
    .service(
        web::resource("/get-requested-meals/{email}")
            .wrap(guarded())
            .route(web::get().to(items::get_requested_meals)),
    );
}
