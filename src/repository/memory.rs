use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Repository, StorageError, UserRepository};
use crate::models::{NewUser, Resource, User};

struct Table<R> {
    next_id: i32,
    rows: BTreeMap<i32, R>,
}

/// Process-local store used when no database is configured, and by the tests.
///
/// Ids start at 1 and are never reused, like a `SERIAL` column.
pub struct MemoryRepository<R> {
    table: RwLock<Table<R>>,
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, StorageError> {
        let table = self.table.read().await;
        let mut rows: Vec<R> = table.rows.values().cloned().collect();
        // Newest first; the id breaks ties between records created in the same instant.
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(rows)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(self.table.read().await.rows.len() as i64)
    }

    async fn find(&self, id: i32) -> Result<Option<R>, StorageError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, input: R::Input) -> Result<R, StorageError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        let record = R::from_input(id, input, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i32, input: R::Input) -> Result<R, StorageError> {
        let mut table = self.table.write().await;
        let record = table.rows.get_mut(&id).ok_or(StorageError::NotFound)?;
        record.apply(input, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: i32) -> Result<R, StorageError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or(StorageError::NotFound)
    }
}

/// In-memory account store. Emails are unique, as enforced by the SQL schema.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StorageError::Duplicate);
        }
        let user = User::new(user);
        users.push(user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(self.users.read().await.len() as i64)
    }
}
