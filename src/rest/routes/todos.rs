// rest/routes/todos.rs — Todo CRUD routes.
//
// Each handler decodes path/body input, calls the task store under its
// mutex, and maps the outcome to a status code plus a `{"message": …}`
// body. Store errors surface through their display text only — internal
// error types never leak to clients.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::store::Task;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct AddTodoBody {
    pub name: String,
    pub due: String,
}

/// Update carries the add fields plus the done flag, as one flat struct.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoBody {
    pub name: String,
    pub due: String,
    pub done: bool,
}

type MessageResponse = (StatusCode, Json<Value>);

fn message(status: StatusCode, text: impl Into<String>) -> MessageResponse {
    (status, Json(json!({ "message": text.into() })))
}

fn parse_id(raw: &str) -> Result<i16, MessageResponse> {
    raw.parse()
        .map_err(|_| message(StatusCode::BAD_REQUEST, "ID must be number."))
}

pub async fn root() -> &'static str {
    "Hello world!"
}

pub async fn list_todos(State(ctx): State<Arc<AppContext>>) -> Json<Vec<Task>> {
    let store = ctx.store.lock().await;
    Json(store.get().to_vec())
}

pub async fn add_todo(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<AddTodoBody>, JsonRejection>,
) -> MessageResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            return message(
                StatusCode::BAD_REQUEST,
                format!("Failed to read data: {}.", e.body_text()),
            )
        }
    };

    let mut store = ctx.store.lock().await;
    match store.add(body.name, body.due).await {
        Ok(_) => message(StatusCode::ACCEPTED, "Added task to the list."),
        Err(e) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to add task: {e}."),
        ),
    }
}

pub async fn delete_todo(
    State(ctx): State<Arc<AppContext>>,
    Path(raw_id): Path<String>,
) -> MessageResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut store = ctx.store.lock().await;
    match store.remove(id).await {
        Ok(()) => message(StatusCode::ACCEPTED, "Task removed from the list."),
        Err(e) => message(
            StatusCode::BAD_REQUEST,
            format!("Failed to delete task: {e}."),
        ),
    }
}

pub async fn update_todo(
    State(ctx): State<Arc<AppContext>>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateTodoBody>, JsonRejection>,
) -> MessageResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            return message(
                StatusCode::BAD_REQUEST,
                format!("Failed to read data: {}.", e.body_text()),
            )
        }
    };

    let mut store = ctx.store.lock().await;
    match store.update(id, body.name, body.due, body.done).await {
        Ok(()) => message(StatusCode::ACCEPTED, "Task updated."),
        Err(e) => message(
            StatusCode::BAD_REQUEST,
            format!("Failed to update task: {e}."),
        ),
    }
}

pub async fn mark_done(
    State(ctx): State<Arc<AppContext>>,
    Path(raw_id): Path<String>,
) -> MessageResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut store = ctx.store.lock().await;
    match store.mark_done(id).await {
        Ok(()) => message(StatusCode::ACCEPTED, "Task marked as done."),
        Err(e) => message(
            StatusCode::BAD_REQUEST,
            format!("Failed to mark task as done: {e}."),
        ),
    }
}
