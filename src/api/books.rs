use crate::{
    database::MongoDB,
    models::BookResponse,
    services::auth_service::Claims,
    services::book_service::{self, CreateBookRequest, UpdateBookRequest},
    services::saved_books_service,
    utils::error::MessageResponse,
};
use actix_web::{web, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "Books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Malformed payload")
    )
)]
pub async fn create_book(
    db: web::Data<MongoDB>,
    request: web::Json<CreateBookRequest>,
) -> HttpResponse {
    log::info!("📚 POST /books - {}", request.title);

    match book_service::create_book(&db, request.into_inner()).await {
        Ok(book) => HttpResponse::Created().json(book),
        Err(e) => {
            log::error!("❌ Error creating book: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/books",
    tag = "Books",
    responses(
        (status = 200, description = "All books", body = [BookResponse])
    )
)]
pub async fn list_books(db: web::Data<MongoDB>) -> HttpResponse {
    match book_service::list_books(&db).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => {
            log::error!("❌ Error listing books: {}", e);
            e.error_response()
        }
    }
}

/// GET /api/books/{userId} - Books listed by one owner
pub async fn list_books_by_owner(
    db: web::Data<MongoDB>,
    owner_id: web::Path<String>,
) -> HttpResponse {
    match book_service::list_books_by_owner(&db, &owner_id).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => {
            log::error!("❌ Error listing books for owner {}: {}", owner_id, e);
            e.error_response()
        }
    }
}

/// PUT /api/books/{id} - Replace provided fields
pub async fn update_book(
    db: web::Data<MongoDB>,
    book_id: web::Path<String>,
    request: web::Json<UpdateBookRequest>,
) -> HttpResponse {
    log::info!("🔧 PUT /books/{}", book_id);

    match book_service::update_book(&db, &book_id, request.into_inner()).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(e) => {
            log::warn!("❌ Error updating book {}: {}", book_id, e);
            e.error_response()
        }
    }
}

/// DELETE /api/books/{id}
pub async fn delete_book(db: web::Data<MongoDB>, book_id: web::Path<String>) -> HttpResponse {
    log::info!("🗑️  DELETE /books/{}", book_id);

    match book_service::delete_book(&db, &book_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Book deleted")),
        Err(e) => {
            log::warn!("❌ Error deleting book {}: {}", book_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/books/{id}/toggle",
    tag = "Books",
    responses(
        (status = 200, description = "Rental flag flipped", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn toggle_rented(db: web::Data<MongoDB>, book_id: web::Path<String>) -> HttpResponse {
    match book_service::toggle_rented(&db, &book_id).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(e) => {
            log::warn!("❌ Error toggling book {}: {}", book_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/books/{bookId}/save",
    tag = "SavedBooks",
    responses(
        (status = 200, description = "Book saved for the caller", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_book(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    book_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔖 POST /books/{}/save - user {}", book_id, user.sub);

    match saved_books_service::save_book(&db, &user.sub, &book_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Book saved successfully")),
        Err(e) => {
            log::warn!("❌ Error saving book {}: {}", book_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/books/saved-books",
    tag = "SavedBooks",
    responses(
        (status = 200, description = "The caller's saved books", body = [BookResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_saved_books(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match saved_books_service::list_saved_books(&db, &user.sub).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => {
            log::warn!("❌ Error listing saved books for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}
