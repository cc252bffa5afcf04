use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub email: String,                // unique, case kept as stored
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub name: Option<String>,         // optional display name
    pub image: Option<String>,        // optional avatar URL
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
