use crate::{
    error::AppError,
    models::{Product, Task},
    repository::{Repository, UserRepository},
    response::ApiResponse,
};
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// Record counts for the admin dashboard.
///
/// Only reachable with an admin session; the access gate answers 403 otherwise.
#[get("/stats")]
pub async fn stats(
    products: web::Data<dyn Repository<Product>>,
    tasks: web::Data<dyn Repository<Task>>,
    users: web::Data<dyn UserRepository>,
) -> Result<impl Responder, AppError> {
    let products = products.count().await?;
    let tasks = tasks.count().await?;
    let users = users.count().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        json!({
            "products": products,
            "tasks": tasks,
            "users": users
        }),
        "Statistiques",
    )))
}
