use crate::{
    database::MongoDB,
    services::auth_service::{
        self, AuthResponse, Claims, LoginRequest, RegisterRequest, UpdateProfileRequest,
    },
};
use actix_web::{web, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request or user already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(&db, request.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            log::warn!("❌ Registration failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

/// GET /api/auth/me - Profile of the authenticated caller
pub async fn get_me(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match auth_service::get_user(&db, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Error fetching current user {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

/// GET /api/auth/{id} - Public profile fields
pub async fn get_user(db: web::Data<MongoDB>, user_id: web::Path<String>) -> HttpResponse {
    match auth_service::get_user(&db, &user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Error fetching user {}: {}", user_id, e);
            e.error_response()
        }
    }
}

/// PUT /api/auth/{id} - Merge name/mobile into the profile
pub async fn update_user(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("🔧 PUT /auth/{} - Updating profile", user_id);

    match auth_service::update_user(&db, &user_id, request.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Error updating user {}: {}", user_id, e);
            e.error_response()
        }
    }
}
