use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "books" collection.
///
/// `owner_name` is a denormalized copy of the owner's display name and is
/// not kept in sync with later profile updates. `owner_id` is a plain hex
/// string reference with no integrity enforcement.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub genre: Option<String>,
    pub location: String,
    pub contact: String,
    pub owner_id: String,
    pub owner_name: String,
    #[serde(default)]
    pub is_rented: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover_url: Option<String>,
    pub created_at: BsonDateTime,
}

/// Book record as returned by the API: `_id` flattened to a hex `id`,
/// timestamp as RFC 3339.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub location: String,
    pub contact: String,
    pub owner_id: String,
    pub owner_name: String,
    pub is_rented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub created_at: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        BookResponse {
            id: book.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            title: book.title,
            author: book.author,
            genre: book.genre,
            location: book.location,
            contact: book.contact,
            owner_id: book.owner_id,
            owner_name: book.owner_name,
            is_rented: book.is_rented,
            cover_url: book.cover_url,
            created_at: book.created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: Some(ObjectId::new()),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: None,
            location: "Austin".to_string(),
            contact: "a@b.com".to_string(),
            owner_id: ObjectId::new().to_hex(),
            owner_name: "Alice".to_string(),
            is_rented: false,
            cover_url: None,
            created_at: BsonDateTime::now(),
        }
    }

    #[test]
    fn test_response_uses_camel_case_wire_names() {
        let response = BookResponse::from(sample_book());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isRented"], false);
        assert!(json.get("ownerId").is_some());
        assert!(json.get("ownerName").is_some());
        // absent optionals are omitted, not null
        assert!(json.get("genre").is_none());
        assert!(json.get("coverUrl").is_none());
    }

    #[test]
    fn test_document_round_trip_keeps_rental_flag() {
        let mut book = sample_book();
        book.is_rented = true;
        let bson = mongodb::bson::to_document(&book).unwrap();
        assert_eq!(bson.get_bool("isRented").unwrap(), true);
        let back: Book = mongodb::bson::from_document(bson).unwrap();
        assert!(back.is_rented);
    }
}
