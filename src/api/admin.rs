use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::error_response;
use crate::models::Role;
use crate::services::UserService;

fn default_role() -> Role {
    Role::Admin
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MakeAdminRequest {
    /// Role to assign; older clients send `Role`
    #[serde(alias = "Role", default = "default_role")]
    #[schema(value_type = String, example = "admin")]
    pub role: Role,
}

/// PATCH /make-admin/{id} - Altera o role do usuário (padrão: admin)
#[utoipa::path(
    patch,
    path = "/make-admin/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body = MakeAdminRequest,
    responses(
        (status = 200, description = "Update result", body = crate::models::UpdateOutcome),
        (status = 500, description = "Failed to make admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn make_admin(
    service: web::Data<UserService>,
    id: web::Path<String>,
    request: web::Json<MakeAdminRequest>,
) -> HttpResponse {
    let role = request.into_inner().role;
    log::info!("🛡️  PATCH /make-admin/{} -> {}", id, role);

    match service.set_role(&id, role).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e, "Failed to make admin"),
    }
}

/// GET /check-admin/{email} - Sem autenticação; `isAdmin` vem do role salvo
#[utoipa::path(
    get,
    path = "/check-admin/{email}",
    tag = "Admin",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "`{isAdmin: bool, user: record | null}`"),
        (status = 403, description = "Forbidden access"),
        (status = 500, description = "Failed to get admin")
    )
)]
pub async fn check_admin(service: web::Data<UserService>, email: web::Path<String>) -> HttpResponse {
    log::info!("🛡️  GET /check-admin/{}", email);

    match service.check_admin(&email).await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(e, "Failed to get admin"),
    }
}

/// DELETE /delete-user/{id} - Remove o usuário pelo ObjectId
#[utoipa::path(
    delete,
    path = "/delete-user/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Delete result", body = crate::models::DeleteOutcome),
        (status = 500, description = "Failed to delete user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(service: web::Data<UserService>, id: web::Path<String>) -> HttpResponse {
    log::info!("🗑️  DELETE /delete-user/{}", id);

    match service.delete_user(&id).await {
        Ok(outcome) => {
            log::info!("✅ Deleted {} user(s)", outcome.deleted_count);
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => error_response(e, "Failed to delete user"),
    }
}
