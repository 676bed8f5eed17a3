//! Shared handler state.

use axum::extract::FromRef;
use taskboard_core::{DeviceStore, TaskStore};

/// Stores handed to every handler. Handlers extract the one they need.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskStore,
    pub devices: DeviceStore,
}

impl AppState {
    pub fn new(tasks: TaskStore, devices: DeviceStore) -> Self {
        Self { tasks, devices }
    }
}

impl FromRef<AppState> for TaskStore {
    fn from_ref(state: &AppState) -> Self {
        state.tasks.clone()
    }
}

impl FromRef<AppState> for DeviceStore {
    fn from_ref(state: &AppState) -> Self {
        state.devices.clone()
    }
}
