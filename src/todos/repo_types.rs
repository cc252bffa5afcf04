use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Todo record. Serialized in camelCase for the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Todo {
    pub(crate) fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: "buy milk".into(),
            completed: false,
            user_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn completed_only_patch_keeps_title() {
        let mut todo = sample();
        todo.apply(TodoPatch {
            title: None,
            completed: Some(true),
        });
        assert_eq!(todo.title, "buy milk");
        assert!(todo.completed);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").unwrap().is_string());
        assert_eq!(json["completed"], false);
    }
}
