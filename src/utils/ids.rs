use crate::utils::error::ApiError;
use mongodb::bson::oid::ObjectId;

/// Parses a client-supplied identifier before any store access.
pub fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|_| ApiError::InvalidIdentifier(format!("Invalid {} ID", what)))
}
