//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can meet, from the access gate down to the storage layer,
//! ends up as one of its variants and is rendered at the request boundary as a fixed
//! HTTP status plus the JSON envelope `{"success": false, "error": <message>}`.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can simply
//! return `Result<_, AppError>`. `From` implementations for `StorageError`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` allow the `?`
//! operator to be used directly.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

use crate::models::ResourceKind;
use crate::repository::StorageError;
use crate::validation::ValidationError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// A mutating call on a protected API prefix arrived without a valid session (HTTP 401).
    AuthenticationRequired,
    /// An admin-only path was requested by a caller whose role is not `admin` (HTTP 403).
    Forbidden,
    /// A resource validator rejected the identifier or the body (HTTP 400).
    Validation(ResourceKind, ValidationError),
    /// No record exists for the requested identifier (HTTP 404).
    NotFound(ResourceKind),
    /// Malformed request that is not tied to a resource validator (HTTP 400).
    BadRequest(String),
    /// Credential sign-in failed (HTTP 401).
    InvalidCredentials(String),
    /// The request conflicts with existing state, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// The persistence layer failed (HTTP 500).
    /// Only the generic message is sent to the client; the detail is logged where it occurs.
    StorageFailure(String),
    /// Invalid or missing start-up configuration (HTTP 500).
    Configuration(String),
    /// Unexpected server-side error, e.g. token signing or hashing failures (HTTP 500).
    InternalServerError(String),
}

impl AppError {
    /// The message placed in the `error` field of the JSON body.
    pub fn message(&self) -> String {
        match self {
            AppError::AuthenticationRequired => "Authentification requise".to_string(),
            AppError::Forbidden => "Accès admin requis".to_string(),
            AppError::Validation(kind, error) => validation_message(*kind, error),
            AppError::NotFound(kind) => kind.not_found_message().to_string(),
            AppError::BadRequest(msg)
            | AppError::InvalidCredentials(msg)
            | AppError::Conflict(msg)
            | AppError::StorageFailure(msg) => msg.clone(),
            AppError::Configuration(_) | AppError::InternalServerError(_) => {
                "Erreur interne du serveur".to_string()
            }
        }
    }
}

fn validation_message(kind: ResourceKind, error: &ValidationError) -> String {
    match error {
        ValidationError::InvalidIdentifier => kind.invalid_id_message().to_string(),
        ValidationError::MissingOrEmptyField(_) => kind.required_field_message().to_string(),
        ValidationError::InvalidPositiveNumber(_) => "Le prix doit être un nombre positif".to_string(),
        ValidationError::InvalidField(field) => format!("Le champ {} est invalide", field),
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::AuthenticationRequired => write!(f, "Authentication required"),
            AppError::Forbidden => write!(f, "Forbidden: admin role required"),
            AppError::Validation(kind, error) => write!(f, "Validation Error ({}): {}", kind, error),
            AppError::NotFound(kind) => write!(f, "Not Found: {}", kind),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidCredentials(msg) => write!(f, "Invalid credentials: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::StorageFailure(msg) => write!(f, "Storage failure: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects carrying the JSON error envelope.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired | AppError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(..) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StorageFailure(_)
            | AppError::Configuration(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(
            self,
            AppError::Configuration(_) | AppError::InternalServerError(_)
        ) {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.message()
        }))
    }
}

/// Converts `StorageError` into `AppError::StorageFailure`.
///
/// Resource handlers map storage errors with an operation-specific message instead;
/// this conversion backs the account and admin routes.
impl From<StorageError> for AppError {
    fn from(error: StorageError) -> AppError {
        log::error!("storage error: {}", error);
        AppError::StorageFailure("Erreur de base de données".into())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::AuthenticationRequired`.
///
/// Token failures never reveal why the token was refused.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("rejected session token: {}", error);
        AppError::AuthenticationRequired
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Failed to hash password: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(AppError::AuthenticationRequired.error_response().status(), 401);
        assert_eq!(AppError::Forbidden.error_response().status(), 403);
        assert_eq!(
            AppError::Validation(ResourceKind::Product, ValidationError::InvalidIdentifier)
                .error_response()
                .status(),
            400
        );
        assert_eq!(AppError::NotFound(ResourceKind::Task).error_response().status(), 404);
        assert_eq!(AppError::Conflict("dup".into()).error_response().status(), 409);
        assert_eq!(
            AppError::StorageFailure("Erreur lors de la création du produit".into())
                .error_response()
                .status(),
            500
        );
    }

    #[actix_rt::test]
    async fn test_gate_errors_render_envelope() {
        let body = body_of(AppError::AuthenticationRequired).await;
        assert_eq!(body, json!({"success": false, "error": "Authentification requise"}));

        let body = body_of(AppError::Forbidden).await;
        assert_eq!(body, json!({"success": false, "error": "Accès admin requis"}));
    }

    #[actix_rt::test]
    async fn test_validation_messages_per_resource() {
        let body = body_of(AppError::Validation(
            ResourceKind::Product,
            ValidationError::InvalidIdentifier,
        ))
        .await;
        assert_eq!(body["error"], "ID du produit invalide");

        let body = body_of(AppError::Validation(
            ResourceKind::Task,
            ValidationError::MissingOrEmptyField("title"),
        ))
        .await;
        assert_eq!(
            body["error"],
            "Le titre de la tâche est requis et doit être une chaîne non vide"
        );

        let body = body_of(AppError::Validation(
            ResourceKind::Product,
            ValidationError::InvalidPositiveNumber("price"),
        ))
        .await;
        assert_eq!(body["error"], "Le prix doit être un nombre positif");

        let body = body_of(AppError::NotFound(ResourceKind::Product)).await;
        assert_eq!(body["error"], "Produit non trouvé");
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_leaked() {
        let body = body_of(AppError::InternalServerError("bcrypt exploded at cost 31".into())).await;
        assert_eq!(body["error"], "Erreur interne du serveur");
    }
}
