use crate::{
    database::MongoDB,
    models::{Book, BookResponse},
    utils::{error::ApiError, ids::parse_object_id},
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::Deserialize;

// ==================== REQUEST MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub location: String,
    pub contact: String,
    pub owner_id: String,
    pub owner_name: String,
    pub cover_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub owner_name: Option<String>,
    pub cover_url: Option<String>,
    pub is_rented: Option<bool>,
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/books - Persists a new listing. New books are never rented.
pub async fn create_book(db: &MongoDB, request: CreateBookRequest) -> Result<BookResponse, ApiError> {
    let collection = db.collection::<Book>("books");

    let book = Book {
        id: Some(ObjectId::new()),
        title: request.title,
        author: request.author,
        genre: request.genre,
        location: request.location,
        contact: request.contact,
        owner_id: request.owner_id,
        owner_name: request.owner_name,
        is_rented: false,
        cover_url: request.cover_url,
        created_at: BsonDateTime::now(),
    };

    collection
        .insert_one(&book)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to create book: {}", e)))?;

    log::info!("✅ Book created: {} by {}", book.title, book.owner_name);

    Ok(BookResponse::from(book))
}

/// GET /api/books - Every book, unfiltered and unpaginated
pub async fn list_books(db: &MongoDB) -> Result<Vec<BookResponse>, ApiError> {
    let collection = db.collection::<Book>("books");

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let mut books = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(book) => books.push(BookResponse::from(book)),
            Err(e) => log::error!("Error reading book: {}", e),
        }
    }

    Ok(books)
}

/// GET /api/books/{userId} - Books listed by one owner. Empty vec when none.
pub async fn list_books_by_owner(
    db: &MongoDB,
    owner_id: &str,
) -> Result<Vec<BookResponse>, ApiError> {
    let collection = db.collection::<Book>("books");

    let mut cursor = collection
        .find(doc! { "ownerId": owner_id })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let mut books = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(book) => books.push(BookResponse::from(book)),
            Err(e) => log::error!("Error reading book: {}", e),
        }
    }

    Ok(books)
}

/// PUT /api/books/{id} - Replaces the provided fields
pub async fn update_book(
    db: &MongoDB,
    book_id: &str,
    request: UpdateBookRequest,
) -> Result<BookResponse, ApiError> {
    let oid = parse_object_id(book_id, "book")?;

    let mut set = Document::new();
    if let Some(title) = request.title {
        set.insert("title", title);
    }
    if let Some(author) = request.author {
        set.insert("author", author);
    }
    if let Some(genre) = request.genre {
        set.insert("genre", genre);
    }
    if let Some(location) = request.location {
        set.insert("location", location);
    }
    if let Some(contact) = request.contact {
        set.insert("contact", contact);
    }
    if let Some(owner_name) = request.owner_name {
        set.insert("ownerName", owner_name);
    }
    if let Some(cover_url) = request.cover_url {
        set.insert("coverUrl", cover_url);
    }
    if let Some(is_rented) = request.is_rented {
        set.insert("isRented", is_rented);
    }

    if set.is_empty() {
        return Err(ApiError::ValidationError("No fields to update".to_string()));
    }

    let collection = db.collection::<Book>("books");

    let updated = collection
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(mongodb::options::ReturnDocument::After)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    Ok(BookResponse::from(updated))
}

/// DELETE /api/books/{id}
pub async fn delete_book(db: &MongoDB, book_id: &str) -> Result<(), ApiError> {
    let oid = parse_object_id(book_id, "book")?;

    let collection = db.collection::<Book>("books");

    let result = collection
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Book not found".to_string()));
    }

    log::info!("🗑️  Book deleted: {}", book_id);

    Ok(())
}

/// PATCH /api/books/{id}/toggle - Flips the rental flag.
///
/// Read-then-write, so two concurrent toggles are last-write-wins. That
/// matches the store's per-document semantics elsewhere in this service.
pub async fn toggle_rented(db: &MongoDB, book_id: &str) -> Result<BookResponse, ApiError> {
    let oid = parse_object_id(book_id, "book")?;

    let collection = db.collection::<Book>("books");

    let book = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    let flipped = !book.is_rented;

    let updated = collection
        .find_one_and_update(
            doc! { "_id": oid },
            doc! { "$set": { "isRented": flipped } },
        )
        .return_document(mongodb::options::ReturnDocument::After)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    log::info!("🔄 Book {} rental flag -> {}", book_id, updated.is_rented);

    Ok(BookResponse::from(updated))
}
