use actix_web::{web, HttpResponse};

use super::{body::DocumentBody, error_response};
use crate::models::ArrayField;
use crate::services::UserService;

/// GET /get-review/{email} - Lista reviews de refeições do usuário
#[utoipa::path(
    get,
    path = "/get-review/{email}",
    tag = "Reviews",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Meal reviews in insertion order"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Failed to get review")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_review(service: web::Data<UserService>, email: web::Path<String>) -> HttpResponse {
    log::info!("📋 GET /get-review/{}", email);

    match service.get_items(&email, ArrayField::ReviewedMeal).await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => error_response(e, "Failed to get review"),
    }
}

/// PATCH /edit-review/{email}/{review_id} - Mescla campos na review com o id informado
#[utoipa::path(
    patch,
    path = "/edit-review/{email}/{review_id}",
    tag = "Reviews",
    params(
        ("email" = String, Path, description = "User email"),
        ("review_id" = String, Path, description = "Value of the review's `id` field")
    ),
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Review updated successfully"),
        (status = 400, description = "Failed to update review"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_review(
    service: web::Data<UserService>,
    path: web::Path<(String, String)>,
    patch: web::Json<DocumentBody>,
) -> HttpResponse {
    let (email, review_id) = path.into_inner();
    log::info!("🔧 PATCH /edit-review/{}/{}", email, review_id);

    match service.edit_review(&email, &review_id, patch.into_inner().0).await {
        Ok(()) => {
            log::info!("✅ Review {} updated", review_id);
            HttpResponse::Ok().json(serde_json::json!({ "message": "Review updated successfully" }))
        }
        Err(e) => error_response(e, "Internal server error"),
    }
}

/// DELETE /delete-review/{email}/{review_id} - Remove a review com o id informado
#[utoipa::path(
    delete,
    path = "/delete-review/{email}/{review_id}",
    tag = "Reviews",
    params(
        ("email" = String, Path, description = "User email"),
        ("review_id" = String, Path, description = "Value of the review's `id` field")
    ),
    responses(
        (status = 200, description = "Review deleted successfully"),
        (status = 400, description = "Failed to delete review"),
        (status = 404, description = "User or review not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review(
    service: web::Data<UserService>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (email, review_id) = path.into_inner();
    log::info!("🗑️  DELETE /delete-review/{}/{}", email, review_id);

    match service.delete_review(&email, &review_id).await {
        Ok(()) => {
            log::info!("✅ Review {} deleted", review_id);
            HttpResponse::Ok().json(serde_json::json!({ "message": "Review deleted successfully" }))
        }
        Err(e) => error_response(e, "Internal server error"),
    }
}
