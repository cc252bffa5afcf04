use serde::Deserialize;

use super::repo_types::TodoPatch;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Body of `PUT /todos/:id`. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(r: UpdateTodoRequest) -> Self {
        Self {
            title: r.title,
            completed: r.completed,
        }
    }
}
