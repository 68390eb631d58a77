pub mod admin;
pub mod auth;
pub mod health;
pub mod resources;

use actix_web::{error::JsonPayloadError, web, Error as ActixError, HttpRequest};

use crate::error::AppError;
use crate::models::{Product, Task};

/// Registers every endpoint. Storage and `AuthSettings` are expected as app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/api/auth")
                .app_data(web::JsonConfig::default().error_handler(json_error))
                .service(auth::signup)
                .service(auth::signin)
                .service(auth::signout)
                .service(auth::session),
        )
        .service(resources::scope::<Product>("/api/products"))
        .service(resources::scope::<Task>("/api/tasks"))
        .service(web::scope("/admin").service(admin::stats));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> ActixError {
    log::debug!("rejected JSON payload: {}", err);
    AppError::BadRequest("Corps de requête JSON invalide".into()).into()
}
