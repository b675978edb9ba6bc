// ==================== ARRAY FIELD ROUTES ====================
// Append and read routes for the list-valued fields of a user record.
// Payment history takes the whole body as the element(s); the insert-*
// routes take the body key named after the field.

use actix_web::{web, HttpResponse};
use mongodb::bson::{Bson, Document};

use super::{
    body::{DocumentBody, ItemsBody},
    error_response,
};
use crate::models::ArrayField;
use crate::services::UserService;
use crate::utils::AppError;

async fn append(
    service: &UserService,
    email: &str,
    field: ArrayField,
    payload: Bson,
) -> HttpResponse {
    match service.append_items(email, field, payload).await {
        Ok(outcome) => {
            log::info!(
                "✅ {} updated for {} (matched {}, upserted {})",
                field.label(),
                email,
                outcome.matched_count,
                outcome.upserted_count
            );
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => error_response(e, &format!("Failed to update {}", field.label())),
    }
}

async fn append_from_body(
    service: &UserService,
    email: &str,
    field: ArrayField,
    mut body: Document,
) -> HttpResponse {
    log::info!("📝 POST {} for {}", field.key(), email);

    match body.remove(field.key()) {
        Some(payload) => append(service, email, field, payload).await,
        None => error_response(
            AppError::bad_request(format!("{} is required", field.key())),
            &format!("Failed to update {}", field.label()),
        ),
    }
}

async fn read(service: &UserService, email: &str, field: ArrayField) -> HttpResponse {
    log::info!("📋 GET {} for {}", field.key(), email);

    match service.get_items(email, field).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => error_response(e, &format!("Failed to get {}", field.label())),
    }
}

// ==================== PAYMENT HISTORY ====================

/// POST /add-payment-history/{email} - Adiciona pagamento(s) ao histórico (cria o usuário se não existir)
#[utoipa::path(
    post,
    path = "/add-payment-history/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "User email")),
    request_body = ItemsBody,
    responses(
        (status = 200, description = "Update result (upserts the user)", body = crate::models::UpdateOutcome),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Failed to update payment history")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_payment_history(
    service: web::Data<UserService>,
    email: web::Path<String>,
    payment: web::Json<ItemsBody>,
) -> HttpResponse {
    log::info!("💳 POST /add-payment-history/{}", email);
    append(&service, &email, ArrayField::PaymentHistory, payment.into_inner().0).await
}

/// GET /get-payment-history/{email} - Histórico de pagamentos do usuário
#[utoipa::path(
    get,
    path = "/get-payment-history/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Payment records in insertion order"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Failed to get payment history")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payment_history(
    service: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    read(&service, &email, ArrayField::PaymentHistory).await
}

// ==================== LIKED MEALS ====================

/// POST /insert-liked-meals/{email} - Adiciona refeições curtidas
#[utoipa::path(
    post,
    path = "/insert-liked-meals/{email}",
    tag = "Meals",
    params(("email" = String, Path, description = "User email")),
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 400, description = "likedMeals is required"),
        (status = 500, description = "Failed to update liked meals")
    ),
    security(("bearer_auth" = []))
)]
pub async fn insert_liked_meals(
    service: web::Data<UserService>,
    email: web::Path<String>,
    body: web::Json<DocumentBody>,
) -> HttpResponse {
    append_from_body(&service, &email, ArrayField::LikedMeals, body.into_inner().0).await
}

/// GET /get-liked-meals/{email} - Refeições curtidas do usuário
#[utoipa::path(
    get,
    path = "/get-liked-meals/{email}",
    tag = "Meals",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Liked meals"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_liked_meals(
    service: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    read(&service, &email, ArrayField::LikedMeals).await
}

// ==================== REQUESTED MEALS ====================

/// POST /insert-requested-meals/{email} - Adiciona refeições solicitadas
#[utoipa::path(
    post,
    path = "/insert-requested-meals/{email}",
    tag = "Meals",
    params(("email" = String, Path, description = "User email")),
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 400, description = "requestedMeal is required"),
        (status = 500, description = "Failed to update requested meals")
    ),
    security(("bearer_auth" = []))
)]
pub async fn insert_requested_meals(
    service: web::Data<UserService>,
    email: web::Path<String>,
    body: web::Json<DocumentBody>,
) -> HttpResponse {
    append_from_body(&service, &email, ArrayField::RequestedMeal, body.into_inner().0).await
}

/// GET /get-requested-meals/{email} - Refeições solicitadas do usuário
#[utoipa::path(
    get,
    path = "/get-requested-meals/{email}",
    tag = "Meals",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Requested meals"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_requested_meals(
    service: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    read(&service, &email, ArrayField::RequestedMeal).await
}

// ==================== SCHOLARSHIPS / APPLICATIONS ====================

/// POST /insert-reviewed-scholarships/{email} - Adiciona bolsas avaliadas
#[utoipa::path(
    post,
    path = "/insert-reviewed-scholarships/{email}",
    tag = "Scholarships",
    params(("email" = String, Path, description = "User email")),
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 400, description = "reviewedScholarship is required"),
        (status = 500, description = "Failed to update reviewed scholarships")
    ),
    security(("bearer_auth" = []))
)]
pub async fn insert_reviewed_scholarships(
    service: web::Data<UserService>,
    email: web::Path<String>,
    body: web::Json<DocumentBody>,
) -> HttpResponse {
    append_from_body(&service, &email, ArrayField::ReviewedScholarship, body.into_inner().0).await
}

/// GET /get-reviewed-scholarships/{email} - Bolsas avaliadas pelo usuário
#[utoipa::path(
    get,
    path = "/get-reviewed-scholarships/{email}",
    tag = "Scholarships",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Reviewed scholarships"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reviewed_scholarships(
    service: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    read(&service, &email, ArrayField::ReviewedScholarship).await
}

/// POST /insert-user-application/{email} - Adiciona candidatura(s) a bolsas
#[utoipa::path(
    post,
    path = "/insert-user-application/{email}",
    tag = "Scholarships",
    params(("email" = String, Path, description = "User email")),
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 400, description = "userApplication is required"),
        (status = 500, description = "Failed to update user applications")
    ),
    security(("bearer_auth" = []))
)]
pub async fn insert_user_application(
    service: web::Data<UserService>,
    email: web::Path<String>,
    body: web::Json<DocumentBody>,
) -> HttpResponse {
    append_from_body(&service, &email, ArrayField::UserApplication, body.into_inner().0).await
}

/// GET /get-my-application/{email} - Candidaturas do usuário
#[utoipa::path(
    get,
    path = "/get-my-application/{email}",
    tag = "Scholarships",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The user's applications"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Failed to get user applications")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_application(
    service: web::Data<UserService>,
    email: web::Path<String>,
) -> HttpResponse {
    read(&service, &email, ArrayField::UserApplication).await
}
