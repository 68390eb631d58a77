pub mod extractors;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::CurrentUser;
pub use gate::{Action, RoutePattern, RouteTable};
pub use middleware::AccessGate;
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use session::read_session;
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    // Something, an @, something, a dot, something; no whitespace anywhere.
    static ref EMAIL_REGEX: regex::Regex = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Payload for a credentials sign-in. Missing fields deserialize as empty strings
/// so that they are reported by validation, not by the JSON extractor.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(regex(path = "EMAIL_REGEX", message = "Adresse email invalide"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignUpRequest {
    /// Presence first, then password length, then email format.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Tous les champs sont requis");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err("Le mot de passe doit contenir au moins 6 caractères");
        }
        self.validate().map_err(|_| "Adresse email invalide")
    }

    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returned by a successful sign-in.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// The signed session token, also set as the session cookie.
    pub token: String,
    pub user_id: String,
    pub role: String,
    /// Expiration timestamp (seconds since epoch).
    pub expires: usize,
}
