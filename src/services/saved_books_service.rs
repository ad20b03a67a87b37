use crate::{
    database::MongoDB,
    models::{Book, BookResponse, User},
    utils::{error::ApiError, ids::parse_object_id},
};
use futures::stream::StreamExt;
use mongodb::bson::doc;

/// POST /api/books/{bookId}/save - Bookmarks a book for the caller.
///
/// `$addToSet` makes the append idempotent at the store, so a rapid
/// double-click produces one entry. The book itself is not looked up;
/// dangling references are tolerated and dropped at read time.
pub async fn save_book(db: &MongoDB, user_id: &str, book_id: &str) -> Result<(), ApiError> {
    let user_oid = parse_object_id(user_id, "user")?;
    let book_oid = parse_object_id(book_id, "book")?;

    let collection = db.collection::<User>("users");

    let result = collection
        .update_one(
            doc! { "_id": user_oid },
            doc! { "$addToSet": { "savedBooks": book_oid } },
        )
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if result.modified_count == 0 {
        log::debug!("Book {} already saved for user {}", book_id, user_id);
    } else {
        log::info!("🔖 Book {} saved for user {}", book_id, user_id);
    }

    Ok(())
}

/// GET /api/books/saved-books - Resolves the caller's bookmarks to full
/// book records.
///
/// The identifier is validated before any store access. Saved IDs whose
/// book has since been deleted simply fall out of the `$in` join.
pub async fn list_saved_books(db: &MongoDB, user_id: &str) -> Result<Vec<BookResponse>, ApiError> {
    let user_oid = parse_object_id(user_id, "user")?;

    let users = db.collection::<User>("users");

    let user = users
        .find_one(doc! { "_id": user_oid })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.saved_books.is_empty() {
        return Ok(vec![]);
    }

    let books = db.collection::<Book>("books");

    let mut cursor = books
        .find(doc! { "_id": { "$in": user.saved_books } })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let mut saved = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(book) => saved.push(BookResponse::from(book)),
            Err(e) => log::error!("Error reading saved book: {}", e),
        }
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::services::auth_service::{register, RegisterRequest};
    use crate::services::book_service::{create_book, delete_book, CreateBookRequest};
    use mongodb::bson::oid::ObjectId;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bookworm_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    async fn register_seeker(db: &MongoDB) -> String {
        let email = format!("{}@example.com", ObjectId::new().to_hex());
        register(
            db,
            RegisterRequest {
                name: "Seeker".to_string(),
                email,
                password: "secret123".to_string(),
                mobile: "5550001111".to_string(),
                role: UserRole::Seeker,
            },
        )
        .await
        .unwrap()
        .user
        .id
    }

    fn sample_book_request() -> CreateBookRequest {
        CreateBookRequest {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: None,
            location: "Austin".to_string(),
            contact: "a@b.com".to_string(),
            owner_id: ObjectId::new().to_hex(),
            owner_name: "Alice".to_string(),
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn test_malformed_user_id_fails_before_store_access() {
        // No MongoDB behind this URI; the parse must fail first
        let result = parse_object_id("definitely-not-an-oid", "user");
        assert!(matches!(result, Err(ApiError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_save_is_idempotent() {
        let db = test_db().await;
        let user_id = register_seeker(&db).await;
        let book = create_book(&db, sample_book_request()).await.unwrap();

        save_book(&db, &user_id, &book.id).await.unwrap();
        save_book(&db, &user_id, &book.id).await.unwrap();

        let saved = list_saved_books(&db, &user_id).await.unwrap();
        assert_eq!(saved.iter().filter(|b| b.id == book.id).count(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_empty_saved_set_is_empty_vec() {
        let db = test_db().await;
        let user_id = register_seeker(&db).await;

        let saved = list_saved_books(&db, &user_id).await.unwrap();
        assert!(saved.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_unknown_user_is_not_found() {
        let db = test_db().await;
        let missing = ObjectId::new().to_hex();

        assert!(matches!(
            save_book(&db, &missing, &ObjectId::new().to_hex()).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            list_saved_books(&db, &missing).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_dangling_reference_is_dropped_silently() {
        let db = test_db().await;
        let user_id = register_seeker(&db).await;

        let kept = create_book(&db, sample_book_request()).await.unwrap();
        let doomed = create_book(&db, sample_book_request()).await.unwrap();

        save_book(&db, &user_id, &kept.id).await.unwrap();
        save_book(&db, &user_id, &doomed.id).await.unwrap();
        delete_book(&db, &doomed.id).await.unwrap();

        let saved = list_saved_books(&db, &user_id).await.unwrap();
        assert!(saved.iter().any(|b| b.id == kept.id));
        assert!(saved.iter().all(|b| b.id != doomed.id));
    }
}
