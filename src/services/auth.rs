use crate::models::{ApiMessage, Role, User};
use crate::routes::AppState;
use actix_web::{dev::Payload, http::StatusCode, web, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Authentication and authorization failures, rendered as the standard
/// JSON error envelope
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingToken,

    #[error("Token invalid or expired")]
    InvalidToken,

    #[error("Could not create token")]
    TokenCreation,

    #[error("User not found")]
    UnknownUser,

    #[error("Account deactivated")]
    Deactivated,

    #[error("Access denied. Role '{0}' not authorized for this route")]
    Forbidden(Role),
}

impl actix_web::error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiMessage::failure(self.to_string()))
    }
}

/// JWT payload: user id, role, issue and expiry timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for the given account
pub fn issue_token(
    user_id: &str,
    role: Role,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::TokenCreation)
}

/// Verify a token's signature and expiry
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Hash a password with a fresh random salt, stored as "salt:digest"
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}:{}", salt, digest(&salt, password))
}

/// Check a password against a stored "salt:digest" value
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(':') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extractor guarding protected routes
///
/// Reads the Bearer token, verifies it, then re-loads the account so
/// deactivated or deleted users are rejected even while their token is
/// still unexpired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    /// Restrict a handler to specific roles
    pub fn authorize(&self, roles: &[Role]) -> Result<(), AuthError> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(self.user.role))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<AuthUser, AuthError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or(AuthError::InvalidToken)?;
            let header = header.ok_or(AuthError::MissingToken)?;
            let token = header
                .strip_prefix("Bearer ")
                .ok_or(AuthError::MissingToken)?;

            let claims = decode_token(token, &state.auth.jwt_secret)?;

            let user = state
                .store
                .get_user(&claims.sub)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load user for token check: {}", e);
                    AuthError::UnknownUser
                })?
                .ok_or(AuthError::UnknownUser)?;

            if !user.is_active {
                return Err(AuthError::Deactivated);
            }

            Ok(AuthUser { user })
        })
    }
}
