use actix_web::{web, HttpResponse, Scope};
use serde_json::json;

use crate::{
    error::AppError, models::Resource, repository::Repository, resources, response::ApiResponse,
};

/// Mounts the list/count/fetch/create/update/delete endpoints for `R` under `path`.
///
/// `/count` is registered before `/{id}` so it is never read as an identifier.
pub fn scope<R: Resource>(path: &str) -> Scope {
    web::scope(path)
        .service(
            web::resource("")
                .route(web::get().to(list::<R>))
                .route(web::post().to(create::<R>)),
        )
        .service(web::resource("/count").route(web::get().to(count::<R>)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(fetch::<R>))
                .route(web::put().to(update::<R>))
                .route(web::delete().to(delete::<R>)),
        )
}

/// Lists every record, newest first.
///
/// ## Responses:
/// - `200 OK`: `{success, data: [..], message: "<n> produit(s) trouvé(s)"}`.
/// - `500 Internal Server Error`: storage failure, generic message only.
pub async fn list<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
) -> Result<HttpResponse, AppError> {
    let records = resources::list(repo.get_ref()).await?;
    let message = R::KIND.listed_message(records.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(records, message)))
}

pub async fn count<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
) -> Result<HttpResponse, AppError> {
    let total = resources::count(repo.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        json!({ "total": total }),
        R::KIND.counted_message(total),
    )))
}

pub async fn fetch<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = resources::fetch(repo.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(record, R::KIND.found_message())))
}

/// Creates a record from a JSON body.
///
/// The body is read as raw bytes so that malformed JSON and validator failures
/// both come back in the standard error envelope.
///
/// ## Responses:
/// - `201 Created`: the stored record with its storage-assigned id and timestamps.
/// - `400 Bad Request`: malformed JSON or a failed validator.
/// - `401 Unauthorized`: no session (raised by the access gate, never reaches here).
pub async fn create<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let record = resources::create(repo.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(record, R::KIND.created_message())))
}

/// Replaces a record's fields.
///
/// ## Responses:
/// - `200 OK`: the updated record.
/// - `400 Bad Request`: invalid identifier, malformed JSON or a failed validator.
/// - `404 Not Found`: no record with that identifier.
pub async fn update<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let record = resources::update(repo.get_ref(), &id, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(record, R::KIND.updated_message())))
}

pub async fn delete<R: Resource>(
    repo: web::Data<dyn Repository<R>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let removed = resources::delete(repo.get_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message(
        R::KIND.deleted_message(removed.label()),
    )))
}
