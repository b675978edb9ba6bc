use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{body::DocumentBody, error_response};
use crate::services::UserService;
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment of a name or email
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdatePlanRequest {
    pub plan: Option<String>,
}

/// POST /add-user-data - Cria usuário (sem deduplicação por email)
#[utoipa::path(
    post,
    path = "/add-user-data",
    tag = "Users",
    request_body = DocumentBody,
    responses(
        (status = 200, description = "User inserted", body = crate::models::InsertOutcome),
        (status = 500, description = "Failed to add user")
    )
)]
pub async fn add_user(
    service: web::Data<UserService>,
    payload: web::Json<DocumentBody>,
) -> HttpResponse {
    log::info!("📝 POST /add-user-data");

    match service.add_user(payload.into_inner().0).await {
        Ok(outcome) => {
            log::info!("✅ User inserted: {:?}", outcome.inserted_id);
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => error_response(e, "Failed to add user"),
    }
}

/// POST /add-google-user-data - Cria usuário do login Google se o email ainda não existe
#[utoipa::path(
    post,
    path = "/add-google-user-data",
    tag = "Users",
    request_body = DocumentBody,
    responses(
        (status = 200, description = "`created` tells whether a new user was stored"),
        (status = 400, description = "Email is required"),
        (status = 500, description = "Failed to add user")
    )
)]
pub async fn add_google_user(
    service: web::Data<UserService>,
    payload: web::Json<DocumentBody>,
) -> HttpResponse {
    log::info!("📝 POST /add-google-user-data");

    match service.add_google_user(payload.into_inner().0).await {
        Ok(result) => {
            log::info!("✅ Google user {} (created: {})", result.user.email, result.created);
            HttpResponse::Ok().json(result)
        }
        Err(e) => error_response(e, "Failed to add user"),
    }
}

/// GET /get-all-users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/get-all-users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user record"),
        (status = 500, description = "Failed to get users")
    )
)]
pub async fn get_all_users(service: web::Data<UserService>) -> HttpResponse {
    log::info!("📋 GET /get-all-users");

    match service.list_users().await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => error_response(e, "Failed to get users"),
    }
}

/// GET /get-user/{email} - Busca usuário pelo email
#[utoipa::path(
    get,
    path = "/get-user/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The user record"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Failed to get user")
    )
)]
pub async fn get_user(service: web::Data<UserService>, email: web::Path<String>) -> HttpResponse {
    log::info!("👤 GET /get-user/{}", email);

    match service.get_user(&email).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(e, "Failed to get user"),
    }
}

/// GET /search-users?query= - Busca por nome ou email (sem diferenciar maiúsculas)
#[utoipa::path(
    get,
    path = "/search-users",
    tag = "Users",
    params(SearchQuery),
    responses(
        (status = 200, description = "`{users: [...]}`"),
        (status = 400, description = "Search query is required"),
        (status = 404, description = "No users found"),
        (status = 500, description = "Failed to search users")
    )
)]
pub async fn search_users(
    service: web::Data<UserService>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    log::info!("🔍 GET /search-users?query={:?}", query.query);

    match service.search_users(query.query.as_deref()).await {
        Ok(users) => {
            log::info!("✅ Search matched {} users", users.len());
            HttpResponse::Ok().json(serde_json::json!({ "users": users }))
        }
        // Zero matches answers with `message`, not `error`.
        Err(AppError::NotFound(msg)) => {
            HttpResponse::NotFound().json(serde_json::json!({ "message": msg }))
        }
        Err(e) => error_response(e, "Failed to search users"),
    }
}

/// PATCH /update-plan/{email} - Atualiza o plano do usuário (sem upsert)
#[utoipa::path(
    patch,
    path = "/update-plan/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 500, description = "Failed to update plan")
    )
)]
pub async fn update_plan(
    service: web::Data<UserService>,
    email: web::Path<String>,
    request: web::Json<UpdatePlanRequest>,
) -> HttpResponse {
    log::info!("🔧 PATCH /update-plan/{} -> {:?}", email, request.plan);

    match service.update_plan(&email, request.into_inner().plan).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e, "Failed to update plan"),
    }
}
