//! Storage seam.
//!
//! Handlers only see the `Repository` and `UserRepository` traits; the concrete
//! backend is chosen once in `main` (Postgres when `DATABASE_URL` is set,
//! otherwise the in-memory store) and shared through `web::Data`.
//!
//! Update and delete are not guarded by a lock spanning the handler's earlier
//! existence check. A row removed in between surfaces as `StorageError::NotFound`
//! from the write itself.

pub mod memory;
pub mod postgres;

use actix_web::web;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::models::{NewUser, Product, Resource, Task, User};

pub use memory::{MemoryRepository, MemoryUserRepository};
pub use postgres::PgRepository;

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No row matched the given key.
    NotFound,
    /// A uniqueness constraint rejected the write.
    Duplicate,
    /// Any other backend failure; the message is for logs only.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "row not found"),
            StorageError::Duplicate => write!(f, "duplicate key"),
            StorageError::Backend(msg) => write!(f, "backend failure: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Converts `sqlx::Error` into `StorageError`.
///
/// `RowNotFound` keeps its meaning; Postgres unique violations (SQLSTATE 23505)
/// become `Duplicate`.
impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> StorageError {
        match error {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                StorageError::Duplicate
            }
            other => StorageError::Backend(other.to_string()),
        }
    }
}

/// Create/read/update/delete/count operations for one resource type, keyed by id.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<R>, StorageError>;
    async fn count(&self) -> Result<i64, StorageError>;
    async fn find(&self, id: i32) -> Result<Option<R>, StorageError>;
    async fn create(&self, input: R::Input) -> Result<R, StorageError>;
    /// Replaces the record's fields. `NotFound` if the id does not exist.
    async fn update(&self, id: i32, input: R::Input) -> Result<R, StorageError>;
    /// Removes the record and returns it. `NotFound` if the id does not exist.
    async fn delete(&self, id: i32) -> Result<R, StorageError>;
}

/// Accounts used by the credentials sign-in flow.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    /// `Duplicate` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, StorageError>;
    async fn count(&self) -> Result<i64, StorageError>;
}

pub type RepositoryState<R> = Arc<dyn Repository<R>>;
pub type UserRepositoryState = Arc<dyn UserRepository>;

/// The three stores the HTTP layer needs, behind their traits.
#[derive(Clone)]
pub struct Storage {
    pub products: RepositoryState<Product>,
    pub tasks: RepositoryState<Task>,
    pub users: UserRepositoryState,
}

impl Storage {
    /// Empty process-local stores.
    pub fn memory() -> Self {
        Self {
            products: Arc::new(MemoryRepository::<Product>::new()),
            tasks: Arc::new(MemoryRepository::<Task>::new()),
            users: Arc::new(MemoryUserRepository::new()),
        }
    }

    /// All three stores backed by one Postgres pool.
    pub fn postgres(repo: PgRepository) -> Self {
        let repo = Arc::new(repo);
        Self {
            products: repo.clone(),
            tasks: repo.clone(),
            users: repo,
        }
    }

    /// Registers each store as `web::Data<dyn ...>` for the handlers.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.products.clone()))
            .app_data(web::Data::from(self.tasks.clone()))
            .app_data(web::Data::from(self.users.clone()));
    }
}
