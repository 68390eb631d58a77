pub mod product;
pub mod resource;
pub mod task;
pub mod user;

pub use product::{Product, ProductInput};
pub use resource::{Operation, Resource, ResourceKind};
pub use task::{Task, TaskInput, TaskPriority, TaskStatus};
pub use user::{NewUser, User, ADMIN_ROLE, DEFAULT_ROLE};
