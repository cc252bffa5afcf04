//! Credential store: persistence boundary for users and todos.
//!
//! The store trusts its caller. Ownership checks live in the handlers.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    todos::repo_types::{Todo, TodoPatch},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    /// Oldest first.
    async fn list_todos(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>>;

    async fn create_todo(&self, owner_id: Uuid, title: &str) -> StoreResult<Todo>;

    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    async fn update_todo(&self, id: Uuid, patch: TodoPatch) -> StoreResult<Todo>;

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()>;

    /// Release pooled resources. Called once at shutdown.
    async fn close(&self) {}
}

pub(crate) fn ensure_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("Title is required".into()));
    }
    Ok(())
}

pub(crate) fn ensure_patch(patch: &TodoPatch) -> StoreResult<()> {
    match patch.title.as_deref() {
        Some(title) => ensure_title(title),
        None => Ok(()),
    }
}

pub(crate) fn email_taken() -> StoreError {
    StoreError::Conflict("Email already registered".into())
}

pub(crate) fn todo_not_found() -> StoreError {
    StoreError::NotFound("Todo not found".into())
}
