use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookWorm Hub API",
        version = "1.0.0",
        description = "Community book-sharing marketplace API.\n\n**Authentication:** Saved-books endpoints require a JWT Bearer token obtained from login or register.",
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,

        // Books
        crate::api::books::create_book,
        crate::api::books::list_books,
        crate::api::books::toggle_rented,

        // Saved books
        crate::api::books::save_book,
        crate::api::books::list_saved_books,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UpdateProfileRequest,
            crate::models::user::UserProfile,
            crate::models::user::UserRole,

            // Books
            crate::services::book_service::CreateBookRequest,
            crate::services::book_service::UpdateBookRequest,
            crate::models::book::BookResponse,

            // Shared
            crate::utils::error::MessageResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login, and user profiles."),
        (name = "Books", description = "Book listings: create, browse, update, delete, toggle rental status."),
        (name = "SavedBooks", description = "Bookmarks scoped to the authenticated caller."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
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
