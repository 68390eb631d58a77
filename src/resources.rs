//! The create/read/update/delete pipeline shared by products and tasks.
//!
//! Mutations run as `identifier -> existence -> body -> persist`; the first
//! failing stage decides the error and later stages never run. In particular a
//! rejected body never reaches storage.

use serde_json::Value;

use crate::error::AppError;
use crate::models::{Operation, Resource};
use crate::repository::{Repository, StorageError};
use crate::validation::parse_identifier;

/// Maps a storage failure for `R` to its client-facing error.
///
/// Not-found keeps its meaning; anything else is logged with its detail and
/// reported with the operation's generic message.
fn storage_error<R: Resource>(op: Operation, error: StorageError) -> AppError {
    match error {
        StorageError::NotFound => AppError::NotFound(R::KIND),
        other => {
            log::error!("{} {:?} failed: {}", R::KIND, op, other);
            AppError::StorageFailure(R::KIND.failure_message(op).to_string())
        }
    }
}

fn identifier<R: Resource>(raw: &str) -> Result<i32, AppError> {
    parse_identifier(raw).map_err(|e| AppError::Validation(R::KIND, e))
}

fn body<R: Resource>(raw: &[u8]) -> Result<R::Input, AppError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|_| AppError::BadRequest("Corps de requête JSON invalide".into()))?;
    R::validate(&value).map_err(|e| AppError::Validation(R::KIND, e))
}

pub async fn list<R: Resource>(repo: &dyn Repository<R>) -> Result<Vec<R>, AppError> {
    repo.list()
        .await
        .map_err(|e| storage_error::<R>(Operation::List, e))
}

pub async fn count<R: Resource>(repo: &dyn Repository<R>) -> Result<i64, AppError> {
    repo.count()
        .await
        .map_err(|e| storage_error::<R>(Operation::Count, e))
}

pub async fn fetch<R: Resource>(repo: &dyn Repository<R>, raw_id: &str) -> Result<R, AppError> {
    let id = identifier::<R>(raw_id)?;
    repo.find(id)
        .await
        .map_err(|e| storage_error::<R>(Operation::Fetch, e))?
        .ok_or(AppError::NotFound(R::KIND))
}

pub async fn create<R: Resource>(repo: &dyn Repository<R>, raw_body: &[u8]) -> Result<R, AppError> {
    let input = body::<R>(raw_body)?;
    repo.create(input)
        .await
        .map_err(|e| storage_error::<R>(Operation::Create, e))
}

pub async fn update<R: Resource>(
    repo: &dyn Repository<R>,
    raw_id: &str,
    raw_body: &[u8],
) -> Result<R, AppError> {
    let id = identifier::<R>(raw_id)?;
    ensure_exists(repo, id, Operation::Update).await?;
    let input = body::<R>(raw_body)?;
    repo.update(id, input)
        .await
        .map_err(|e| storage_error::<R>(Operation::Update, e))
}

/// Deletes the record and returns it, so the caller can name it in the response.
pub async fn delete<R: Resource>(repo: &dyn Repository<R>, raw_id: &str) -> Result<R, AppError> {
    let id = identifier::<R>(raw_id)?;
    ensure_exists(repo, id, Operation::Delete).await?;
    repo.delete(id)
        .await
        .map_err(|e| storage_error::<R>(Operation::Delete, e))
}

async fn ensure_exists<R: Resource>(
    repo: &dyn Repository<R>,
    id: i32,
    op: Operation,
) -> Result<(), AppError> {
    match repo.find(id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(AppError::NotFound(R::KIND)),
        Err(e) => Err(storage_error::<R>(op, e)),
    }
}
