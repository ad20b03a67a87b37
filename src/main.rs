mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting BookWorm Hub API...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Malformed JSON bodies get the unified { "message": … } shape
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            utils::error::ApiError::ValidationError(err.to_string()).into()
        });

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(json_config)
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me)),
                    )
                    .route("/{id}", web::get().to(api::auth::get_user))
                    .route("/{id}", web::put().to(api::auth::update_user)),
            )
            // Book endpoints
            .service(
                web::scope("/api/books")
                    // Protected, caller-scoped endpoints
                    .service(
                        web::resource("/saved-books")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::books::list_saved_books)),
                    )
                    .service(
                        web::resource("/{book_id}/save")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::post().to(api::books::save_book)),
                    )
                    // Public endpoints
                    .route("", web::post().to(api::books::create_book))
                    .route("", web::get().to(api::books::list_books))
                    .route("/{id}/toggle", web::patch().to(api::books::toggle_rented))
                    .route("/{id}", web::put().to(api::books::update_book))
                    .route("/{id}", web::delete().to(api::books::delete_book))
                    .route("/{user_id}", web::get().to(api::books::list_books_by_owner)), // must stay last (catch-all)
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
