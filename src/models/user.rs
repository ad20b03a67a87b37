use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Seeker,
}

/// Document in the "users" collection.
///
/// Field names follow the wire format of the original service (camelCase),
/// so the same names land in MongoDB and in JSON.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String, // bcrypt hash, never serialized to clients
    pub mobile: String,
    pub role: UserRole,
    #[serde(default)]
    pub saved_books: Vec<ObjectId>,
    pub created_at: BsonDateTime,
}

/// Public profile fields, returned by the API. No password.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: UserRole,
    pub created_at: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            role: user.role,
            created_at: user
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Owner).unwrap(), "\"owner\"");
        assert_eq!(
            serde_json::to_string(&UserRole::Seeker).unwrap(),
            "\"seeker\""
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<UserRole, _> = serde_json::from_str("\"admin\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_omits_password() {
        let user = User {
            id: Some(ObjectId::new()),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            mobile: "5551234567".to_string(),
            role: UserRole::Owner,
            saved_books: vec![],
            created_at: BsonDateTime::now(),
        };

        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "owner");
        assert_eq!(json["id"], user.id.unwrap().to_hex());
    }
}
