use crate::database::MongoDB;
use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<MongoDB>) -> impl Responder {
    let database = match db.database().run_command(doc! { "ping": 1 }).await {
        Ok(_) => "connected",
        Err(e) => {
            log::warn!("⚠️  Health check: MongoDB ping failed: {}", e);
            "unreachable"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if database == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        service: "bookworm-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
