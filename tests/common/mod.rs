#![allow(dead_code)]

use actix_web::http::header;
use std::sync::Arc;
use stockroom::auth::{generate_token, Claims, RouteTable};
use stockroom::config::{AuthSettings, Config};

pub const TEST_SECRET: &str = "integration-test-secret";

/// The default configuration with a fixed JWT secret.
pub fn config() -> Config {
    Config::from_lookup(|key| (key == "JWT_SECRET").then(|| TEST_SECRET.to_string()))
        .expect("default configuration must be valid")
}

pub fn settings() -> Arc<AuthSettings> {
    Arc::new(config().auth)
}

pub fn route_table() -> Arc<RouteTable> {
    Arc::new(config().route_table().expect("default route table must compile"))
}

/// A signed session token, as issued by sign-in.
pub fn token(role: Option<&str>) -> String {
    let settings = settings();
    let claims = Claims::new("test-user", role.map(str::to_string), &settings);
    generate_token(&claims, &settings).expect("failed to sign test token")
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Builds the full application over the given `Storage`, wrapped in the access gate.
macro_rules! test_app {
    ($storage:expr) => {{
        let storage: stockroom::repository::Storage = $storage;
        let settings = common::settings();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| storage.register(cfg))
                .app_data(actix_web::web::Data::from(settings.clone()))
                .wrap(stockroom::auth::AccessGate::new(
                    common::route_table(),
                    settings,
                ))
                .wrap(actix_web::middleware::Logger::default())
                .configure(stockroom::routes::config),
        )
        .await
    }};
}
