use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use super::token::Claims;
use crate::error::AppError;

/// The verified session of the caller, taken from request extensions.
///
/// `AccessGate` stores the claims there whenever a valid token accompanies an
/// allowed request. Without one, extraction fails with
/// `AppError::AuthenticationRequired`; use `Option<CurrentUser>` on routes
/// that also serve anonymous callers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(CurrentUser(claims))),
            None => ready(Err(AppError::AuthenticationRequired.into())),
        }
    }
}
