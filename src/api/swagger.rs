use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Records Service API",
        version = "1.0.0",
        description = "User profiles, payment history, meal reviews, liked/requested meals and scholarship applications.\n\n**Authentication:** routes marked with a lock require a JWT Bearer token.\n\n**Append routes** replace the whole array on write: concurrent appends to the same user are last-write-wins."
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::add_user,
        crate::api::users::add_google_user,
        crate::api::users::get_all_users,
        crate::api::users::get_user,
        crate::api::users::search_users,
        crate::api::users::update_plan,

        // Payments
        crate::api::items::add_payment_history,
        crate::api::items::get_payment_history,

        // Reviews
        crate::api::reviews::get_review,
        crate::api::reviews::edit_review,
        crate::api::reviews::delete_review,

        // Meals / Scholarships
        crate::api::items::insert_liked_meals,
        crate::api::items::get_liked_meals,
        crate::api::items::insert_requested_meals,
        crate::api::items::get_requested_meals,
        crate::api::items::insert_reviewed_scholarships,
        crate::api::items::get_reviewed_scholarships,
        crate::api::items::insert_user_application,
        crate::api::items::get_my_application,

        // Admin
        crate::api::admin::make_admin,
        crate::api::admin::check_admin,
        crate::api::admin::delete_user,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::body::DocumentBody,
            crate::api::body::ItemsBody,
            crate::api::users::UpdatePlanRequest,
            crate::api::admin::MakeAdminRequest,
            crate::models::InsertOutcome,
            crate::models::UpdateOutcome,
            crate::models::DeleteOutcome,
        )
    ),
    tags(
        (name = "Health", description = "Service health."),
        (name = "Users", description = "Create, list, look up and search user records."),
        (name = "Payments", description = "Payment history of a user."),
        (name = "Reviews", description = "Meal reviews stored on the user record, addressed by review `id`."),
        (name = "Meals", description = "Liked and requested meals."),
        (name = "Scholarships", description = "Reviewed scholarships and scholarship applications."),
        (name = "Admin", description = "Role management and user deletion."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
