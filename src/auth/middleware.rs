use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, HttpResponse, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

use super::gate::{sign_in_location, Action, RouteTable};
use super::session::read_session;
use crate::config::AuthSettings;
use crate::error::AppError;

/// Applies the route table to every request before it reaches a handler.
///
/// On `Allow`, verified claims (if any) are stored in the request extensions
/// for the `CurrentUser` extractor.
#[derive(Clone)]
pub struct AccessGate {
    table: Arc<RouteTable>,
    settings: Arc<AuthSettings>,
}

impl AccessGate {
    pub fn new(table: Arc<RouteTable>, settings: Arc<AuthSettings>) -> Self {
        Self { table, settings }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateService {
            service,
            table: self.table.clone(),
            settings: self.settings.clone(),
        }))
    }
}

pub struct AccessGateService<S> {
    service: S,
    table: Arc<RouteTable>,
    settings: Arc<AuthSettings>,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = read_session(req.request(), &self.settings);
        // Decide on the path the router will match, with percent-encoded
        // unreserved characters already decoded.
        let action = self
            .table
            .decide(req.match_info().as_str(), req.method(), token.as_ref());

        let response = match action {
            Action::Allow => {
                if let Some(claims) = token {
                    req.extensions_mut().insert(claims);
                }
                let fut = self.service.call(req);
                return Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                });
            }
            Action::RedirectToSignIn { callback } => {
                log::debug!("redirecting {} to sign-in", callback);
                HttpResponse::TemporaryRedirect()
                    .insert_header((
                        header::LOCATION,
                        sign_in_location(&self.settings.sign_in_path, &callback),
                    ))
                    .finish()
            }
            Action::DenyAuthRequired => {
                log::debug!(
                    "{} {} refused: no session",
                    req.method(),
                    req.match_info().as_str()
                );
                AppError::AuthenticationRequired.error_response()
            }
            Action::DenyForbidden => {
                log::debug!(
                    "{} {} refused: admin role required",
                    req.method(),
                    req.match_info().as_str()
                );
                AppError::Forbidden.error_response()
            }
        };

        Box::pin(ready(Ok(req.into_response(response.map_into_right_body()))))
    }
}
