//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    email_taken, ensure_patch, ensure_title, todo_not_found, CredentialStore, StoreResult,
};
use crate::{
    auth::repo_types::User,
    todos::repo_types::{Todo, TodoPatch},
};

/// Thread-safe store kept in process memory. Todos are held in insertion
/// order, which is also creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Users by email.
    users: RwLock<HashMap<String, User>>,
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write();
        if users.contains_key(email) {
            return Err(email_taken());
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: None,
            image: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn list_todos(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>> {
        Ok(self
            .todos
            .read()
            .iter()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_todo(&self, owner_id: Uuid, title: &str) -> StoreResult<Todo> {
        ensure_title(title)?;
        let todo = Todo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            user_id: owner_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.todos.write().push(todo.clone());
        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(self.todos.read().iter().find(|t| t.id == id).cloned())
    }

    async fn update_todo(&self, id: Uuid, patch: TodoPatch) -> StoreResult<Todo> {
        ensure_patch(&patch)?;
        let mut todos = self.todos.write();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(todo_not_found)?;
        todo.apply(patch);
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let mut todos = self.todos.write();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(todo_not_found());
        }
        Ok(())
    }
}
