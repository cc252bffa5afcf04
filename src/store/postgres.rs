use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{
    email_taken, ensure_patch, ensure_title, todo_not_found, CredentialStore, StoreError,
    StoreResult,
};
use crate::{
    auth::repo_types::User,
    todos::repo_types::{Todo, TodoPatch},
};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, image, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, image, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => email_taken(),
            other => StoreError::Database(other),
        })?;
        Ok(user)
    }

    async fn list_todos(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, completed, user_id, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_todo(&self, owner_id: Uuid, title: &str) -> StoreResult<Todo> {
        ensure_title(title)?;
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, title, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, completed, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, completed, user_id, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update_todo(&self, id: Uuid, patch: TodoPatch) -> StoreResult<Todo> {
        ensure_patch(&patch)?;
        // COALESCE keeps the stored value for fields the patch leaves out.
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                completed = COALESCE($3, completed)
            WHERE id = $1
            RETURNING id, title, completed, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await?;
        todo.ok_or_else(todo_not_found)
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(todo_not_found());
        }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}
