//! Entity models for tasks and devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation;
use crate::Result;

/// A task row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a task. Id and creation time are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::required(Some(self.title.as_str()), "Title")?;
        Ok(())
    }
}

/// Partial task update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        validation::non_blank_if_present(self.title.as_deref(), "Title")
    }
}

/// A mobile device record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub model: String,
    pub storage: String,
}

/// Fields accepted when registering a device; all three are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub model: String,
    pub storage: String,
}

impl NewDevice {
    pub fn validate(&self) -> Result<()> {
        validation::required(Some(self.name.as_str()), "Name")?;
        validation::required(Some(self.model.as_str()), "Model")?;
        validation::required(Some(self.storage.as_str()), "Storage")?;
        Ok(())
    }
}

/// Partial device update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub storage: Option<String>,
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.model.is_none() && self.storage.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        validation::non_blank_if_present(self.name.as_deref(), "Name")?;
        validation::non_blank_if_present(self.model.as_deref(), "Model")?;
        validation::non_blank_if_present(self.storage.as_deref(), "Storage")?;
        Ok(())
    }

    /// Applies the supplied fields to `device` in place.
    pub fn apply_to(self, device: &mut Device) {
        if let Some(name) = self.name {
            device.name = name;
        }
        if let Some(model) = self.model {
            device.model = model;
        }
        if let Some(storage) = self.storage {
            device.storage = storage;
        }
    }
}
