/// User accounts and token issuance
///
/// Registration hashes the password with Argon2id off the async runtime;
/// login answers every failure with the same `InvalidCredentials` error so
/// callers cannot tell unknown emails from wrong passwords.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::jwt::{self, Claims, JwtError, TokenType};
use crate::auth::password::{self, HashCost, PasswordError};
use crate::models::user::{CreateUser, User};
use crate::store::{Store, StoreError};

/// Error type for account operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[source] JwtError),

    #[error("User {0} not found")]
    NotFound(Uuid),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssue(#[source] JwtError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Input for registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Access and refresh tokens for one user
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    jwt_secret: Arc<str>,
    hash_cost: HashCost,
}

/// Emails are compared case-insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: impl Into<Arc<str>>, hash_cost: HashCost) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
            hash_cost,
        }
    }

    /// Creates an account
    pub async fn register(&self, registration: Registration) -> Result<User, UserError> {
        password::validate_password_strength(&registration.password)
            .map_err(UserError::WeakPassword)?;

        let email = normalize_email(&registration.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let cost = self.hash_cost;
        let plaintext = registration.password;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password_with(&plaintext, cost))
                .await??;

        let user = User::new(CreateUser {
            name: registration.name.trim().to_string(),
            email,
            password_hash,
        });

        let user = self.store.insert_user(&user).await.map_err(|e| match e {
            // lost a race with a concurrent registration
            StoreError::UniqueViolation(_) => UserError::EmailTaken,
            other => UserError::Store(other),
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a token pair
    pub async fn login(&self, email: &str, plaintext: &str) -> Result<(User, TokenPair), UserError> {
        let email = normalize_email(email);
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let plaintext = plaintext.to_string();
        let valid =
            tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
                .await??;

        if !valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, tokens))
    }

    /// Access and refresh tokens for `user_id`
    pub fn issue_tokens(&self, user_id: Uuid) -> Result<TokenPair, UserError> {
        let access = jwt::create_token(&Claims::new(user_id, TokenType::Access), &self.jwt_secret)
            .map_err(UserError::TokenIssue)?;
        let refresh =
            jwt::create_token(&Claims::new(user_id, TokenType::Refresh), &self.jwt_secret)
                .map_err(UserError::TokenIssue)?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            token_type: "Bearer",
            expires_in: TokenType::Access.default_expiration().num_seconds(),
        })
    }

    /// Exchanges a refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> Result<String, UserError> {
        jwt::refresh_access_token(refresh_token, &self.jwt_secret).map_err(UserError::InvalidToken)
    }

    pub async fn get_by_id(&self, user_id: Uuid) -> Result<User, UserError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }
}
