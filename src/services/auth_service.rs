//! Authentication service - registration, login and token verification.
//!
//! Password hashing lives in the `domain::Password` value object; this
//! service only orchestrates lookups and token issuance.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Actor, CreateUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verified against when the email is unknown, so a miss costs the same as
/// a wrong password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$3nN3bbH8Jx7QvwP0JtzU7Wq3l0yD0pW8cXKQH6w9m1E";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The acting user described by these claims.
    pub fn actor(&self) -> AppResult<Actor> {
        let role: UserRole = self.role.parse().map_err(|_| AppError::Unauthorized)?;
        Ok(Actor::new(self.sub, role))
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a tenant or landlord account
    async fn register(&self, input: CreateUser) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: CreateUser) -> AppResult<User> {
        if !input.role.is_self_assignable() {
            return Err(AppError::validation("Role must be TENANT or LANDLORD"));
        }

        let email = normalize_email(&input.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = User::new(email, password_hash, input.name.trim().to_string(), input.role);
        let user = self.uow.users().create(user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let found = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        let hash = found
            .as_ref()
            .map_or(DUMMY_HASH, |user| user.password_hash.as_str());
        let password_valid = Password::from_hash(hash.to_string()).verify(&password);

        let user = match found {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !user.is_active() {
            tracing::warn!(user_id = %user.id, status = %user.status, "Login refused for inactive account");
            return Err(AppError::Forbidden);
        }

        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use crate::infra::repositories::MockUserRepository;
    use crate::services::testing::TestUnitOfWork;

    const SECRET: &str = "test-secret-key-with-at-least-32-chars";

    fn stored_user(password: &str, status: UserStatus) -> User {
        let hash = Password::new(password).unwrap().into_string();
        let mut user = User::new(
            "landlord@example.com".to_string(),
            hash,
            "Pat Owner".to_string(),
            UserRole::Landlord,
        );
        user.status = status;
        user
    }

    fn service(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(
            Arc::new(TestUnitOfWork::default().with_users(users)),
            Config::with_secret(SECRET),
        )
    }

    fn registration(role: UserRole) -> CreateUser {
        CreateUser {
            email: " New@Example.com ".to_string(),
            password: "SecurePass123!".to_string(),
            name: "New User".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|u| u.email == "new@example.com" && u.role == UserRole::Tenant)
            .returning(|u| Ok(u));

        let user = service(users)
            .register(registration(UserRole::Tenant))
            .await
            .unwrap();
        assert_eq!(user.email, "new@example.com");
        assert_ne!(user.password_hash, "SecurePass123!");
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role() {
        let result = service(MockUserRepository::new())
            .register(registration(UserRole::Admin))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("whatever123", UserStatus::Active))));

        let result = service(users).register(registration(UserRole::Landlord)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("SecurePass123!", UserStatus::Active);
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(users);
        let token = auth
            .login("landlord@example.com".to_string(), "SecurePass123!".to_string())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = auth.verify_token(&token.access_token).unwrap();
        let actor = claims.actor().unwrap();
        assert_eq!(actor.id, user_id);
        assert_eq!(actor.role, UserRole::Landlord);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("SecurePass123!", UserStatus::Active);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(users)
            .login("landlord@example.com".to_string(), "wrong-password".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users)
            .login("nobody@example.com".to_string(), "SecurePass123!".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_suspended_account_is_forbidden() {
        let user = stored_user("SecurePass123!", UserStatus::Suspended);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = service(users)
            .login("landlord@example.com".to_string(), "SecurePass123!".to_string())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let user = stored_user("SecurePass123!", UserStatus::Active);
        let token = generate_token(&user, &Config::with_secret("another-secret-key-with-32-characters!")).unwrap();
        let result = verify_token_internal(&token.access_token, &Config::with_secret(SECRET));
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }
}
