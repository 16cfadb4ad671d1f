//! Todo CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Deserializer};
use tracing::info;

use tasknest_core::types::Todo;
use tasknest_core::validation::{self, Schema};

use crate::error::ApiError;
use crate::extract::{RequestSchema, ValidatedJson};
use crate::state::AppState;

const TODO_NOT_FOUND: &str = "Todo not found!";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
}

impl RequestSchema for CreateTodoRequest {
    fn schema() -> Schema {
        validation::create_todo_schema()
    }
}

/// Partial update. The outer `Option` tells "absent" (`None`, leave the
/// field alone) from "present" (`Some`, even when the value is `null`).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub checked: Option<Option<bool>>,
}

impl RequestSchema for UpdateTodoRequest {
    fn schema() -> Schema {
        validation::update_todo_schema()
    }
}

impl UpdateTodoRequest {
    fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(checked) = self.checked {
            todo.checked = checked;
        }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Ids that do not parse as a number simply match nothing.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(TODO_NOT_FOUND.to_string()))
}

fn not_found() -> ApiError {
    ApiError::NotFound(TODO_NOT_FOUND.to_string())
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /todos - every todo.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.todos.list()?;
    if todos.is_empty() {
        return Err(ApiError::NotFound("No todos found".to_string()));
    }
    Ok(Json(todos))
}

/// POST /todos - create an unchecked todo.
pub async fn create_todo(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let title = body
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is not found".to_string()))?;

    let id = state.todos.allocate_id()?;
    let todo = state.todos.insert(Todo::new(id, title))?;

    info!(todo_id = todo.id, "Todo created");
    Ok(Json(todo))
}

/// GET /todos/{id} - a single todo.
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.todos.find(&|t| t.id == id)?.ok_or_else(not_found)?;
    Ok(Json(todo))
}

/// PUT /todos/{id} - change only the fields present in the body.
///
/// An unknown id is reported before any problem with the body.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<ValidatedJson<UpdateTodoRequest>, ApiError>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    if state.todos.find(&|t| t.id == id)?.is_none() {
        return Err(not_found());
    }
    let ValidatedJson(body) = body?;

    let todo = state
        .todos
        .update(&id, &mut |t| body.apply(t))?
        .ok_or_else(not_found)?;

    info!(todo_id = todo.id, "Todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/{id} - remove and return a todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.todos.delete(&id)?.ok_or_else(not_found)?;

    info!(todo_id = todo.id, "Todo deleted");
    Ok(Json(todo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateTodoRequest = serde_json::from_str(r#"{"checked": true}"#).unwrap();
        assert_eq!(absent.title, None);
        assert_eq!(absent.checked, Some(Some(true)));

        let null: UpdateTodoRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(null.title, Some(None));
        assert_eq!(null.checked, None);
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut todo = Todo::new(1, "Buy milk".to_string());
        let patch: UpdateTodoRequest = serde_json::from_str(r#"{"checked": true}"#).unwrap();
        patch.apply(&mut todo);
        assert_eq!(todo.title.as_deref(), Some("Buy milk"));
        assert_eq!(todo.checked, Some(true));
    }

    #[test]
    fn test_apply_writes_explicit_empty_and_null() {
        let mut todo = Todo::new(1, "Buy milk".to_string());
        let patch: UpdateTodoRequest =
            serde_json::from_str(r#"{"title": "", "checked": null}"#).unwrap();
        patch.apply(&mut todo);
        assert_eq!(todo.title.as_deref(), Some(""));
        assert_eq!(todo.checked, None);
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let err = serde_json::from_str::<UpdateTodoRequest>(r#"{"checked": "yes"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_id("-1"), Err(ApiError::NotFound(_))));
    }
}
