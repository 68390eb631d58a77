use actix_web::{http::header, HttpRequest};

use super::token::{verify_token, Claims};
use crate::config::AuthSettings;

/// Reads the caller's session token, if any.
///
/// The `Authorization: Bearer` header wins over the session cookie. A token
/// that fails verification is reported as absent: the gate fails closed.
pub fn read_session(req: &HttpRequest, settings: &AuthSettings) -> Option<Claims> {
    let raw = bearer_token(req).or_else(|| {
        req.cookie(&settings.cookie_name)
            .map(|cookie| cookie.value().to_string())
    })?;

    match verify_token(&raw, settings) {
        Ok(claims) => Some(claims),
        Err(_) => {
            log::debug!("ignoring invalid session token on {}", req.path());
            None
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
