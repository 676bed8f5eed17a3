//! Taskboard Core Library
//!
//! Entity models, persistence and validation rules shared by the taskboard
//! server and CLI. Tasks live in a SQLite table, devices in an in-memory
//! store; both are exposed through the [`ResourceStore`] trait.

pub mod database;
pub mod device_store;
pub mod models;
pub mod store;
pub mod validation;

pub use database::{Database, SharedConnection, TaskColumn, TaskStore, UpdateBuilder};
pub use device_store::DeviceStore;
pub use models::{Device, DevicePatch, NewDevice, NewTask, Task, TaskPatch};
pub use store::ResourceStore;

use thiserror::Error;

/// Result type for taskboard operations
pub type Result<T> = std::result::Result<T, TaskboardError>;

/// General error type for taskboard operations
#[derive(Error, Debug)]
pub enum TaskboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
