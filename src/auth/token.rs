use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::error::AppError;
use crate::models::ADMIN_ROLE;

/// Represents the claims encoded within a session token (JWT).
///
/// The token is issued at sign-in and only ever read afterwards; nothing in the
/// request path mutates it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: String,
    /// Role granted at sign-in, e.g. `user` or `admin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

impl Claims {
    pub fn new(subject: impl Into<String>, role: Option<String>, settings: &AuthSettings) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.into(),
            role,
            iat: now as usize,
            exp: (now + settings.session_max_age.num_seconds()) as usize,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Signs `claims` with the configured secret.
///
/// # Returns
/// The encoded token, or `AppError::InternalServerError` if encoding fails.
pub fn generate_token(claims: &Claims, settings: &AuthSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token string and decodes its claims.
///
/// Signature and expiry are both checked. Any failure, including a malformed
/// token, converts to `AppError::AuthenticationRequired`.
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
