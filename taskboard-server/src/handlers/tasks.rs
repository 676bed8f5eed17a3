//! Task CRUD handlers.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskboard_core::{validation, NewTask, ResourceStore, Task, TaskPatch, TaskStore};

const NOT_FOUND: &str = "Task not found";

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Only the mutable columns may appear; anything else is a 400.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl CreateTaskRequest {
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        let title = validation::required(self.title.as_deref(), "Title")?;
        Ok(NewTask::new(title)
            .with_description(self.description.unwrap_or_default())
            .with_completed(self.completed.unwrap_or(false)))
    }
}

impl UpdateTaskRequest {
    fn into_patch(self) -> Result<TaskPatch, ApiError> {
        let patch = TaskPatch {
            title: self.title,
            description: self.description,
            completed: self.completed,
        };
        patch.validate()?;
        Ok(patch)
    }
}

pub async fn list_tasks(State(store): State<TaskStore>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(store.get_all()?))
}

pub async fn get_task(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    store
        .get_by_id(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create_task(
    State(store): State<TaskStore>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(req) = payload?;
    let draft = req.into_new_task()?;

    let task = store.create(draft)?;
    tracing::info!("Task {} created", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(req) = payload?;
    let patch = req.into_patch()?;

    store
        .update(&id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_task(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !store.delete(&id)? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    tracing::info!("Task {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
