use crate::{
    database::MongoDB,
    models::{User, UserProfile, UserRole},
    utils::{error::ApiError, ids::parse_object_id},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (hex)
    pub email: String,
    pub role: UserRole,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
}

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

// ==================== TOKEN HANDLING ====================

/// Generate a 24h JWT for the given user
pub fn generate_jwt(user: &User) -> Result<String, ApiError> {
    let user_id = user
        .id
        .map(|oid| oid.to_hex())
        .ok_or_else(|| ApiError::DatabaseError("User has no assigned ID".to_string()))?;

    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id,
        email: user.email.clone(),
        role: user.role,
        iat,
        exp,
        jti,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| ApiError::DatabaseError(format!("Failed to generate token: {}", e)))
}

/// Verify signature and expiry, returning the decoded claims
pub fn verify_token(token: &str) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| ApiError::InvalidToken(format!("Invalid token: {}", e)))
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/auth/register - Creates a user with a bcrypt password hash
pub async fn register(db: &MongoDB, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
    let collection = db.collection::<User>("users");

    let existing = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if existing.is_some() {
        return Err(ApiError::ValidationError(
            "User already exists".to_string(),
        ));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ApiError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: Some(ObjectId::new()),
        name: request.name,
        email: request.email,
        password: hashed_password,
        mobile: request.mobile,
        role: request.role,
        saved_books: vec![],
        created_at: BsonDateTime::now(),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to create user: {}", e)))?;

    let token = generate_jwt(&new_user)?;

    log::info!("✅ User registered: {} ({:?})", new_user.email, new_user.role);

    Ok(AuthResponse {
        token,
        user: UserProfile::from(&new_user),
    })
}

/// POST /api/auth/login - Verifies credentials and issues a token
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| ApiError::DatabaseError(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(ApiError::Unauthenticated("Invalid credentials".to_string()));
    }

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })
}

/// GET /api/auth/{id} - Public profile fields
pub async fn get_user(db: &MongoDB, user_id: &str) -> Result<UserProfile, ApiError> {
    let oid = parse_object_id(user_id, "user")?;

    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(UserProfile::from(&user))
}

/// PUT /api/auth/{id} - Merges name/mobile into the profile
pub async fn update_user(
    db: &MongoDB,
    user_id: &str,
    request: UpdateProfileRequest,
) -> Result<UserProfile, ApiError> {
    let oid = parse_object_id(user_id, "user")?;

    let mut set = doc! {};
    if let Some(name) = request.name {
        set.insert("name", name);
    }
    if let Some(mobile) = request.mobile {
        set.insert("mobile", mobile);
    }

    if set.is_empty() {
        return Err(ApiError::ValidationError(
            "No fields to update".to_string(),
        ));
    }

    let collection = db.collection::<User>("users");

    let updated = collection
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(mongodb::options::ReturnDocument::After)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(UserProfile::from(&updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "unused-in-token-tests".to_string(),
            mobile: "5551234567".to_string(),
            role: UserRole::Owner,
            saved_books: vec![],
            created_at: BsonDateTime::now(),
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = sample_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.unwrap().to_hex());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Owner);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = generate_jwt(&sample_user()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        match verify_token(&tampered) {
            Err(ApiError::InvalidToken(_)) => {}
            other => panic!("Expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let user = sample_user();
        let iat = (Utc::now() - Duration::hours(48)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(24)).timestamp() as usize;
        let claims = Claims {
            sub: user.id.unwrap().to_hex(),
            email: user.email,
            role: user.role,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token),
            Err(ApiError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not-a-jwt"),
            Err(ApiError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hashed = hash("hunter22", DEFAULT_COST).unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(verify("hunter22", &hashed).unwrap());
        assert!(!verify("hunter23", &hashed).unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_register_then_login() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bookworm_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@example.com", ObjectId::new().to_hex());
        let registered = register(
            &db,
            RegisterRequest {
                name: "Bob".to_string(),
                email: email.clone(),
                password: "secret123".to_string(),
                mobile: "5559876543".to_string(),
                role: UserRole::Seeker,
            },
        )
        .await
        .unwrap();
        assert_eq!(registered.user.email, email);

        // duplicate registration rejected
        let duplicate = register(
            &db,
            RegisterRequest {
                name: "Bob".to_string(),
                email: email.clone(),
                password: "secret123".to_string(),
                mobile: "5559876543".to_string(),
                role: UserRole::Seeker,
            },
        )
        .await;
        assert!(matches!(duplicate, Err(ApiError::ValidationError(_))));

        let logged_in = login(
            &db,
            &LoginRequest {
                email: email.clone(),
                password: "secret123".to_string(),
            },
        )
        .await
        .unwrap();
        let claims = verify_token(&logged_in.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);

        let bad = login(
            &db,
            &LoginRequest {
                email,
                password: "wrong".to_string(),
            },
        )
        .await;
        assert!(matches!(bad, Err(ApiError::Unauthenticated(_))));
    }
}
