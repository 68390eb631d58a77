//! Route classification and the per-request access decision.
//!
//! `RouteTable::decide` is a pure function of the request path, the HTTP method
//! and the caller's verified session token. It never reads global state and
//! never establishes or revokes a session; `AccessGate` in `middleware` turns
//! the returned `Action` into a response.

use actix_web::http::Method;
use regex::Regex;
use url::form_urlencoded;

use super::token::Claims;
use crate::error::AppError;

/// Outcome of the access decision for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Let the request through to its handler.
    Allow,
    /// Send the browser to the sign-in page, returning to `callback` afterwards.
    RedirectToSignIn { callback: String },
    /// HTTP 401: a mutating API call without a session.
    DenyAuthRequired,
    /// HTTP 403: an admin-only path without the admin role.
    DenyForbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// The whole path must match the template.
    Exact,
    /// The path must match the template or lie below it.
    Prefix,
}

/// A path template such as `/products/[id]/edit`.
///
/// A segment written as `[name]` matches exactly one non-empty path segment;
/// every other segment is literal. A trailing slash on the request path is ignored.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    regex: Regex,
}

impl RoutePattern {
    /// A pattern that matches the template exactly.
    pub fn page(template: &str) -> Result<Self, AppError> {
        Self::compile(template, MatchMode::Exact)
    }

    /// A pattern that matches the template and every path beneath it, on segment
    /// boundaries: `/admin` covers `/admin/users` but not `/administrator`.
    pub fn prefix(template: &str) -> Result<Self, AppError> {
        Self::compile(template, MatchMode::Prefix)
    }

    fn compile(template: &str, mode: MatchMode) -> Result<Self, AppError> {
        let trimmed = template.trim().trim_end_matches('/');
        if !template.trim().starts_with('/') {
            return Err(AppError::Configuration(format!(
                "route pattern `{}` must start with `/`",
                template
            )));
        }

        let body = trimmed
            .split('/')
            .skip(1)
            .map(|segment| {
                if segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']') {
                    "[^/]+".to_string()
                } else {
                    regex::escape(segment)
                }
            })
            .fold(String::new(), |mut acc, segment| {
                acc.push('/');
                acc.push_str(&segment);
                acc
            });

        let source = match mode {
            MatchMode::Exact => format!("^{}/?$", body),
            MatchMode::Prefix => format!("^{}(?:/.*)?$", body),
        };
        let regex = Regex::new(&source).map_err(|e| {
            AppError::Configuration(format!("invalid route pattern `{}`: {}", template, e))
        })?;

        Ok(Self { regex })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// The three disjoint pattern sets, built once at start-up.
///
/// Paths matched by none of them are public.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    admin_only: Vec<RoutePattern>,
    authenticated_pages: Vec<RoutePattern>,
    authenticated_api: Vec<RoutePattern>,
}

impl RouteTable {
    /// Compiles a table from templates.
    ///
    /// Admin-only templates and API templates are prefixes; page templates are exact.
    pub fn new<S: AsRef<str>>(
        admin_only: &[S],
        authenticated_pages: &[S],
        authenticated_api: &[S],
    ) -> Result<Self, AppError> {
        Ok(Self {
            admin_only: compile_all(admin_only, RoutePattern::prefix)?,
            authenticated_pages: compile_all(authenticated_pages, RoutePattern::page)?,
            authenticated_api: compile_all(authenticated_api, RoutePattern::prefix)?,
        })
    }

    pub fn is_admin_only(&self, path: &str) -> bool {
        self.admin_only.iter().any(|p| p.matches(path))
    }

    pub fn is_authenticated_page(&self, path: &str) -> bool {
        self.authenticated_pages.iter().any(|p| p.matches(path))
    }

    pub fn is_authenticated_api(&self, path: &str) -> bool {
        self.authenticated_api.iter().any(|p| p.matches(path))
    }

    /// Decides what happens to a request.
    ///
    /// `token` must already be verified; an expired or malformed token is passed
    /// as `None`. Rules are checked in order: admin-only, authenticated page,
    /// authenticated API (mutating methods only). Reads on API prefixes need no session.
    pub fn decide(&self, path: &str, method: &Method, token: Option<&Claims>) -> Action {
        if self.is_admin_only(path) && !token.map_or(false, Claims::is_admin) {
            return Action::DenyForbidden;
        }

        if self.is_authenticated_page(path) && token.is_none() {
            return Action::RedirectToSignIn {
                callback: path.to_string(),
            };
        }

        if self.is_authenticated_api(path) && is_mutating(method) && token.is_none() {
            return Action::DenyAuthRequired;
        }

        Action::Allow
    }
}

fn compile_all<S: AsRef<str>>(
    templates: &[S],
    compile: fn(&str) -> Result<RoutePattern, AppError>,
) -> Result<Vec<RoutePattern>, AppError> {
    templates.iter().map(|t| compile(t.as_ref())).collect()
}

/// POST, PUT, PATCH and DELETE change state; every other method is a read.
pub fn is_mutating(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Builds the redirect target, carrying the original path as `callbackUrl`.
pub fn sign_in_location(sign_in_path: &str, callback: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(callback.as_bytes()).collect();
    format!("{}?callbackUrl={}", sign_in_path, encoded)
}
