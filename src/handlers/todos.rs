use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::clock;
use crate::db::{delete_todo, get_todo, insert_todo, list_todos, mark_complete, overwrite_todo};
use crate::error::AppError;
use crate::models::{CreatedTodo, ListTodos, RowsAffected, Todo, TodoPayload};
use crate::AppState;

/// All todos, newest first, with completion tallies.
pub async fn list(State(state): State<AppState>) -> Result<Json<ListTodos>, AppError> {
    let todos = list_todos(&state.db)?;
    let total_completed = todos.iter().filter(|todo| todo.completed).count();
    let total_not_completed = todos.len() - total_completed;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(ListTodos {
        total_completed,
        total_not_completed,
        todos,
    }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, AppError> {
    match get_todo(&state.db, id)? {
        Some(todo) => Ok(Json(todo)),
        None => Err(AppError::NotFound),
    }
}

/// Validates the body and inserts a row. A missing `dateOfCreation` is
/// filled in with a freshly normalized timestamp.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CreatedTodo>), AppError> {
    let payload = TodoPayload::from_value(&body)?;
    let creation = match payload.date_of_creation.clone() {
        Some(supplied) => supplied,
        None => clock::now_with_fixed_offset(),
    };

    let id = insert_todo(&state.db, &payload, &creation)?;
    info!(id, title = %payload.title, "Created todo");
    Ok((StatusCode::CREATED, Json(CreatedTodo { id })))
}

/// Full overwrite of the row matching `id` with the supplied values.
/// Affecting zero rows is not an error.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<RowsAffected>, AppError> {
    let payload = TodoPayload::from_value(&body)?;
    let rows_affected = overwrite_todo(&state.db, id, &payload)?;
    info!(id, rows_affected, "Updated todo");
    Ok(Json(RowsAffected { rows_affected }))
}

/// Sets `completed` and a server-generated completion timestamp; any
/// client-supplied completion time is ignored.
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RowsAffected>, AppError> {
    let completion = clock::now_with_fixed_offset();
    let rows_affected = mark_complete(&state.db, id, &completion)?;
    info!(id, rows_affected, "Marked todo complete");
    Ok(Json(RowsAffected { rows_affected }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RowsAffected>, AppError> {
    let rows_affected = delete_todo(&state.db, id)?;
    info!(id, rows_affected, "Deleted todo");
    Ok(Json(RowsAffected { rows_affected }))
}
