use async_trait::async_trait;
use sqlx::PgPool;

use super::{Repository, StorageError, UserRepository};
use crate::models::{NewUser, Product, ProductInput, Task, TaskInput, User};

const PRODUCT_COLUMNS: &str = "id, name, price, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, role, password_hash, created_at";

/// Postgres backend. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Repository<Product> for PgRepository {
    async fn list(&self) -> Result<Vec<Product>, StorageError> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Product>, StorageError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, input: ProductInput) -> Result<Product, StorageError> {
        let sql = format!(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING {}",
            PRODUCT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(input.name)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, id: i32, input: ProductInput) -> Result<Product, StorageError> {
        let sql = format!(
            "UPDATE products SET name = $1, price = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {}",
            PRODUCT_COLUMNS
        );
        // fetch_one turns a vanished row into RowNotFound, hence StorageError::NotFound.
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(input.name)
            .bind(input.price)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: i32) -> Result<Product, StorageError> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS);
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl Repository<Task> for PgRepository {
    async fn list(&self) -> Result<Vec<Task>, StorageError> {
        let sql = format!(
            "SELECT {} FROM tasks ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql).fetch_all(&self.pool).await?)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Task>, StorageError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, input: TaskInput) -> Result<Task, StorageError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, id: i32, input: TaskInput) -> Result<Task, StorageError> {
        let sql = format!(
            "UPDATE tasks \
             SET title = $1, description = $2, status = $3, priority = $4, due_date = $5, \
                 updated_at = NOW() \
             WHERE id = $6 RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: i32) -> Result<Task, StorageError> {
        let sql = format!("DELETE FROM tasks WHERE id = $1 RETURNING {}", TASK_COLUMNS);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        let user = User::new(user);
        let sql = format!(
            "INSERT INTO users (id, name, email, role, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(user.name)
            .bind(user.email)
            .bind(user.role)
            .bind(user.password_hash)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }
}
