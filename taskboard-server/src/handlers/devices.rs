//! Device CRUD handlers.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskboard_core::{Device, DevicePatch, DeviceStore, NewDevice, ResourceStore};

const NOT_FOUND: &str = "Device not found";

#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub name: Option<String>,
    pub model: Option<String>,
    pub storage: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub model: Option<String>,
    pub storage: Option<String>,
}

pub async fn list_devices(
    State(store): State<DeviceStore>,
) -> Result<Json<Vec<Device>>, ApiError> {
    Ok(Json(store.get_all()?))
}

pub async fn get_device(
    State(store): State<DeviceStore>,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    store
        .get_by_id(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn create_device(
    State(store): State<DeviceStore>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let Json(req) = payload?;
    let draft = NewDevice {
        name: req.name.unwrap_or_default(),
        model: req.model.unwrap_or_default(),
        storage: req.storage.unwrap_or_default(),
    };
    draft.validate()?;

    let device = store.create(draft)?;
    tracing::info!("Device {} created", device.id);
    Ok((StatusCode::CREATED, Json(device)))
}

pub async fn update_device(
    State(store): State<DeviceStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<Json<Device>, ApiError> {
    let Json(req) = payload?;
    let patch = DevicePatch {
        name: req.name,
        model: req.model,
        storage: req.storage,
    };
    patch.validate()?;

    store
        .update(&id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_device(
    State(store): State<DeviceStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !store.delete(&id)? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    tracing::info!("Device {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
