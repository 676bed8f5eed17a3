//! Database layer for task persistence.
//!
//! Schema management lives in [`schema`], the partial update builder in
//! [`update`] and the CRUD operations in [`task_store`].

pub mod schema;
pub mod task_store;
pub mod update;

pub use schema::{Database, SharedConnection, CURRENT_SCHEMA_VERSION};
pub use task_store::TaskStore;
pub use update::{Column, TaskColumn, UpdateBuilder, UpdateStatement};
