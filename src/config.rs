use chrono::Duration;
use std::env;

use crate::auth::RouteTable;
use crate::error::AppError;

/// Session and access-gate settings shared by the token, session and middleware code.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Lifetime of a session token, also used as the cookie `Max-Age`.
    pub session_max_age: Duration,
    pub cookie_name: String,
    pub sign_in_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_max_age: Duration::days(30),
            cookie_name: "session-token".to_string(),
            sign_in_path: "/auth/signin".to_string(),
        }
    }
}

pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthSettings,
    pub admin_routes: Vec<String>,
    pub protected_pages: Vec<String>,
    pub protected_api_prefixes: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| AppError::Configuration("JWT_SECRET must be set".into()))?;

        let server_port = match var("SERVER_PORT") {
            Some(port) => port.trim().parse().map_err(|_| {
                AppError::Configuration(format!("SERVER_PORT must be a number, got `{}`", port))
            })?,
            None => 8080,
        };

        let max_age_days: i64 = match var("SESSION_MAX_AGE_DAYS") {
            Some(days) => days
                .trim()
                .parse()
                .ok()
                .filter(|days| *days > 0)
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "SESSION_MAX_AGE_DAYS must be a positive number, got `{}`",
                        days
                    ))
                })?,
            None => 30,
        };

        let defaults = AuthSettings::default();

        Ok(Self {
            database_url: var("DATABASE_URL"),
            server_port,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            auth: AuthSettings {
                jwt_secret,
                session_max_age: Duration::days(max_age_days),
                cookie_name: var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
                sign_in_path: var("SIGN_IN_PATH").unwrap_or(defaults.sign_in_path),
            },
            admin_routes: list(var("ADMIN_ROUTES"), "/admin"),
            protected_pages: list(
                var("PROTECTED_PAGES"),
                "/products/new,/products/[id]/edit,/tasks/new,/tasks/[id]/edit",
            ),
            protected_api_prefixes: list(
                var("PROTECTED_API_PREFIXES"),
                "/api/products,/api/tasks",
            ),
        })
    }

    /// Compiles the configured route templates.
    pub fn route_table(&self) -> Result<RouteTable, AppError> {
        RouteTable::new(
            self.admin_routes.as_slice(),
            self.protected_pages.as_slice(),
            self.protected_api_prefixes.as_slice(),
        )
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn list(value: Option<String>, default: &str) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or(default)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
