use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::UserRepository;
use crate::models::{Auth0Profile, Role, User};
use crate::services::user_service::parse_user_id;
use crate::utils::{AppError, AppResult};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user ObjectId hex
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
    pub typ: TokenType,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    /// Auth0 ID token; the `Authorization` header is used when absent
    #[serde(default)]
    pub id_token: Option<String>,
}

/// A user together with a fresh token pair
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub auth0_user_id: String,
}

#[derive(Debug, Deserialize)]
struct Auth0IdClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn encode_token(config: &Config, user: &User, typ: TokenType) -> AppResult<String> {
    let now = Utc::now();
    let ttl = match typ {
        TokenType::Access => config.access_ttl_secs,
        TokenType::Refresh => config.refresh_ttl_secs,
    };

    let claims = Claims {
        sub: user.id_hex(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(ttl)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
        typ,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

fn issue_session(config: &Config, user: User) -> AppResult<AuthSession> {
    let access_token = encode_token(config, &user, TokenType::Access)?;
    let refresh_token = encode_token(config, &user, TokenType::Refresh)?;
    Ok(AuthSession {
        user,
        access_token,
        refresh_token,
    })
}

fn decode_token(config: &Config, token: &str, expected: TokenType) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    if claims.typ != expected {
        return Err(AppError::Unauthorized("Invalid or expired token".into()));
    }
    Ok(claims)
}

/// Verifies an access token. Refresh tokens are rejected.
pub fn verify_access(config: &Config, token: &str) -> AppResult<Claims> {
    decode_token(config, token, TokenType::Access)
}

pub async fn signup(
    users: &dyn UserRepository,
    config: &Config,
    request: &SignupRequest,
) -> AppResult<AuthSession> {
    let name = request.name.trim();
    let email = normalize_email(&request.email);

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;
    let mut user = User::new_local(name.to_string(), email, password_hash);
    user.id = Some(users.insert_user(&user).await?);

    log::info!("✅ User registered: {}", user.email);
    issue_session(config, user)
}

pub async fn login(
    users: &dyn UserRepository,
    config: &Config,
    request: &LoginRequest,
) -> AppResult<AuthSession> {
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let user = users
        .find_user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    // Auth0-only accounts have no local password
    let stored = user.password_hash.as_deref().ok_or_else(invalid)?;
    if !verify(&request.password, stored)? {
        return Err(invalid());
    }

    log::info!("🔐 User logged in: {}", user.email);
    issue_session(config, user)
}

/// The caller's user id, taken from the token subject
pub fn subject_id(claims: &Claims) -> AppResult<ObjectId> {
    parse_user_id(&claims.sub).map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
}

pub async fn refresh(users: &dyn UserRepository, config: &Config, refresh_token: &str) -> AppResult<AuthSession> {
    let claims = decode_token(config, refresh_token, TokenType::Refresh)?;
    let id = subject_id(&claims)?;

    let user = users
        .find_user_by_id(&id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    issue_session(config, user)
}

pub async fn current_user(users: &dyn UserRepository, claims: &Claims) -> AppResult<User> {
    let id = subject_id(claims)?;

    users
        .find_user_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Loads the caller and checks the stored role, not the one carried in the token
pub async fn require_admin(users: &dyn UserRepository, claims: &Claims) -> AppResult<User> {
    let user = current_user(users, claims).await?;
    if !user.is_admin() {
        log::warn!("🚫 Admin access denied for {}", user.email);
        return Err(AppError::Forbidden("Forbidden: admin access required".into()));
    }
    Ok(user)
}

fn verify_auth0_token(config: &Config, id_token: &str) -> AppResult<Auth0IdClaims> {
    let auth0 = config
        .auth0
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Auth0 is not configured".into()))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[auth0.client_id.as_str()]);
    validation.set_issuer(&[auth0.issuer()]);

    decode::<Auth0IdClaims>(
        id_token,
        &DecodingKey::from_secret(auth0.client_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::warn!("⚠️  Auth0 ID token rejected: {}", e);
        AppError::Unauthorized("Unauthorized".into())
    })
}

/// Upserts the local record for an Auth0 login
pub async fn sync_auth0_user(
    users: &dyn UserRepository,
    config: &Config,
    id_token: Option<&str>,
) -> AppResult<SyncedUser> {
    let token = id_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

    let claims = verify_auth0_token(config, token)?;

    let email = claims
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".into()))?;

    let profile = Auth0Profile {
        auth0_user_id: claims.sub,
        email,
        name: claims.name.or(claims.nickname).unwrap_or_default(),
    };

    let user = users
        .upsert_auth0_user(&profile)
        .await?
        .ok_or_else(|| AppError::Internal("Auth0 upsert returned no document".into()))?;

    log::info!("🔄 Auth0 user synced: {}", user.email);
    Ok(SyncedUser {
        id: user.id_hex(),
        email: user.email,
        name: user.name,
        auth0_user_id: user.auth0_user_id.unwrap_or(profile.auth0_user_id),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use serde_json::json;

    /// Inserts a user directly and returns an access token for it
    pub(crate) async fn seed_user(store: &MemoryStore, config: &Config, email: &str, role: Role) -> (User, String) {
        let mut user = User::new_local("Test".into(), email.into(), "not-a-hash".into());
        user.role = role;
        user.id = Some(store.insert_user(&user).await.unwrap());
        let token = encode_token(config, &user, TokenType::Access).unwrap();
        (user, token)
    }

    pub(crate) fn auth0_token(config: &Config, claims: serde_json::Value) -> String {
        let secret = &config.auth0.as_ref().unwrap().client_secret;
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn signup_request(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryStore::new();
        let config = Config::for_tests();

        let session = signup(&store, &config, &signup_request("Ana", " Ana@Example.com ", "supersecret"))
            .await
            .unwrap();
        assert_eq!(session.user.email, "ana@example.com");
        assert_eq!(session.user.role, Role::User);

        let claims = verify_access(&config, &session.access_token).unwrap();
        assert_eq!(claims.sub, session.user.id_hex());
        assert_eq!(claims.typ, TokenType::Access);

        let login_req = LoginRequest { email: "ANA@example.com".into(), password: "supersecret".into() };
        assert!(login(&store, &config, &login_req).await.is_ok());

        let wrong = LoginRequest { email: "ana@example.com".into(), password: "wrongpass".into() };
        let err = login(&store, &config, &wrong).await.unwrap_err();
        assert_eq!(err, AppError::Unauthorized("Invalid credentials".into()));
    }

    #[tokio::test]
    async fn test_signup_validation_and_duplicates() {
        let store = MemoryStore::new();
        let config = Config::for_tests();

        for req in [
            signup_request("", "a@b.c", "supersecret"),
            signup_request("A", "not-an-email", "supersecret"),
            signup_request("A", "a@b.c", "short"),
        ] {
            assert!(matches!(signup(&store, &config, &req).await, Err(AppError::Validation(_))));
        }

        signup(&store, &config, &signup_request("A", "a@b.c", "supersecret")).await.unwrap();
        let err = signup(&store, &config, &signup_request("B", "A@B.C", "supersecret")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let store = MemoryStore::new();
        let config = Config::for_tests();
        let session = signup(&store, &config, &signup_request("Ana", "ana@example.com", "supersecret"))
            .await
            .unwrap();

        assert!(verify_access(&config, &session.refresh_token).is_err());
        assert!(refresh(&store, &config, &session.access_token).await.is_err());

        let renewed = refresh(&store, &config, &session.refresh_token).await.unwrap();
        assert_eq!(renewed.user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let store = MemoryStore::new();
        let config = Config::for_tests();
        let (_, token) = seed_user(&store, &config, "a@b.c", Role::User).await;

        let mut other = Config::for_tests();
        other.jwt_secret = "another-secret".into();
        assert!(verify_access(&other, &token).is_err());
    }

    #[tokio::test]
    async fn test_require_admin() {
        let store = MemoryStore::new();
        let config = Config::for_tests();
        let (_, user_token) = seed_user(&store, &config, "user@example.com", Role::User).await;
        let (_, admin_token) = seed_user(&store, &config, "admin@example.com", Role::Admin).await;

        let claims = verify_access(&config, &admin_token).unwrap();
        assert!(require_admin(&store, &claims).await.unwrap().is_admin());

        let claims = verify_access(&config, &user_token).unwrap();
        let err = require_admin(&store, &claims).await.unwrap_err();
        assert_eq!(err, AppError::Forbidden("Forbidden: admin access required".into()));

        let mut ghost = claims.clone();
        ghost.sub = ObjectId::new().to_hex();
        let err = require_admin(&store, &ghost).await.unwrap_err();
        assert_eq!(err, AppError::NotFound("User not found".into()));
    }

    #[tokio::test]
    async fn test_sync_auth0_user_upserts() {
        let store = MemoryStore::new();
        let config = Config::for_tests();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        let token = auth0_token(
            &config,
            json!({
                "sub": "auth0|123",
                "email": "Sam@Example.com",
                "nickname": "sam",
                "aud": "test-client",
                "iss": "https://vitalbox.test.auth0.com/",
                "exp": exp
            }),
        );

        let first = sync_auth0_user(&store, &config, Some(&token)).await.unwrap();
        assert_eq!(first.email, "sam@example.com");
        assert_eq!(first.name, "sam");
        assert_eq!(first.auth0_user_id, "auth0|123");

        let second = sync_auth0_user(&store, &config, Some(&token)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_sync_auth0_user_rejections() {
        let store = MemoryStore::new();
        let config = Config::for_tests();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        let err = sync_auth0_user(&store, &config, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let wrong_audience = auth0_token(
            &config,
            json!({ "sub": "auth0|1", "email": "a@b.c", "aud": "other", "iss": "https://vitalbox.test.auth0.com/", "exp": exp }),
        );
        let err = sync_auth0_user(&store, &config, Some(&wrong_audience)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let no_email = auth0_token(
            &config,
            json!({ "sub": "auth0|1", "aud": "test-client", "iss": "https://vitalbox.test.auth0.com/", "exp": exp }),
        );
        let err = sync_auth0_user(&store, &config, Some(&no_email)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.user_count(), 0);
    }
}
