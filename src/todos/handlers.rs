use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{claims::Identity, extractors::AuthUser},
    error::{AppError, AppResult},
    state::AppState,
};

use super::{
    dto::{CreateTodoRequest, UpdateTodoRequest},
    repo_types::{Todo, TodoPatch},
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = state.store.list_todos(identity.user_id).await?;
    Ok(Json(todos))
}

#[instrument(skip(state, payload), fields(user_id = %identity.user_id))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(bad_body)?;
    let title = payload.title.unwrap_or_default();
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let todo = state.store.create_todo(identity.user_id, &title).await?;
    info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Todo>> {
    let todo = load_owned(&state, &id, &identity, "view").await?;
    Ok(Json(todo))
}

#[instrument(skip(state, payload), fields(user_id = %identity.user_id))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> AppResult<Json<Todo>> {
    let todo = load_owned(&state, &id, &identity, "update").await?;

    let Json(payload) = payload.map_err(bad_body)?;
    let patch = TodoPatch::from(payload);
    if matches!(patch.title.as_deref(), Some(t) if t.trim().is_empty()) {
        return Err(AppError::Validation("Title must not be empty".into()));
    }

    let updated = state.store.update_todo(todo.id, patch).await?;
    info!(todo_id = %updated.id, completed = updated.completed, "todo updated");
    Ok(Json(updated))
}

#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let todo = load_owned(&state, &id, &identity, "delete").await?;
    state.store.delete_todo(todo.id).await?;
    info!(todo_id = %todo.id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a todo and make sure the caller owns it.
async fn load_owned(
    state: &AppState,
    raw_id: &str,
    caller: &Identity,
    action: &str,
) -> AppResult<Todo> {
    let raw_id = raw_id.trim();
    if raw_id.is_empty() {
        return Err(AppError::Validation("Todo ID is required".into()));
    }
    // Not a UUID, so no todo can carry it.
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;

    let todo = state.store.get_todo(id).await?.ok_or_else(not_found)?;
    if todo.user_id != caller.user_id {
        warn!(todo_id = %todo.id, owner = %todo.user_id, "todo access denied");
        return Err(AppError::Authorization(format!(
            "Unauthorized to {action} this todo"
        )));
    }
    Ok(todo)
}

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

fn bad_body(rejection: JsonRejection) -> AppError {
    warn!(error = %rejection.body_text(), "unreadable request body");
    AppError::Validation("Request body must be a JSON object".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, JwtConfig, MEMORY_DATABASE_URL};

    fn state() -> AppState {
        AppState::in_memory(AppConfig {
            database_url: MEMORY_DATABASE_URL.into(),
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 60,
            },
            cookie_secure: false,
            host: "127.0.0.1".into(),
            port: 0,
        })
    }

    fn caller() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "a@x.com".into(),
        }
    }

    #[tokio::test]
    async fn load_owned_checks_id_and_owner() {
        let state = state();
        let owner = caller();
        let stranger = caller();
        let todo = state.store.create_todo(owner.user_id, "mine").await.unwrap();
        let id = todo.id.to_string();

        assert_eq!(load_owned(&state, &id, &owner, "view").await.unwrap(), todo);
        assert!(matches!(
            load_owned(&state, &id, &stranger, "view").await,
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            load_owned(&state, "", &owner, "view").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load_owned(&state, "not-a-uuid", &owner, "view").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            load_owned(&state, &Uuid::new_v4().to_string(), &owner, "view").await,
            Err(AppError::NotFound(_))
        ));
    }
}
