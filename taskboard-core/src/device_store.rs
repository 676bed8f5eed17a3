//! In-memory device store.

use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Device, DevicePatch, NewDevice};
use crate::store::ResourceStore;
use crate::{Result, TaskboardError};

/// Thread-safe device collection keyed by id, listed in insertion order.
#[derive(Clone, Default)]
pub struct DeviceStore {
    devices: Arc<RwLock<IndexMap<String, Device>>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the two demo handsets.
    pub fn with_demo_devices() -> Self {
        let demo = [
            ("1", "iPhone 13", "A2482", "128GB"),
            ("2", "Samsung Galaxy S21", "SM-G991U", "256GB"),
        ];
        let devices: IndexMap<String, Device> = demo
            .into_iter()
            .map(|(id, name, model, storage)| {
                (
                    id.to_string(),
                    Device {
                        id: id.to_string(),
                        name: name.to_string(),
                        model: model.to_string(),
                        storage: storage.to_string(),
                    },
                )
            })
            .collect();

        Self {
            devices: Arc::new(RwLock::new(devices)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<String, Device>>> {
        self.devices
            .read()
            .map_err(|e| TaskboardError::Unavailable(format!("Lock error: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<String, Device>>> {
        self.devices
            .write()
            .map_err(|e| TaskboardError::Unavailable(format!("Lock error: {}", e)))
    }
}

impl ResourceStore for DeviceStore {
    type Record = Device;
    type Draft = NewDevice;
    type Patch = DevicePatch;

    fn get_all(&self) -> Result<Vec<Device>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Device>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn create(&self, draft: NewDevice) -> Result<Device> {
        draft.validate()?;

        let device = Device {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            model: draft.model,
            storage: draft.storage,
        };
        self.write()?.insert(device.id.clone(), device.clone());
        debug!("Created device: {}", device.id);

        Ok(device)
    }

    fn update(&self, id: &str, patch: DevicePatch) -> Result<Option<Device>> {
        patch.validate()?;

        let mut devices = self.write()?;
        let Some(device) = devices.get_mut(id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(device);
            debug!("Updated device: {}", id);
        }

        Ok(Some(device.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        // shift_remove keeps the remaining devices in insertion order
        let removed = self.write()?.shift_remove(id).is_some();
        if removed {
            debug!("Deleted device: {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_device(name: &str) -> NewDevice {
        NewDevice {
            name: name.to_string(),
            model: "M1".to_string(),
            storage: "64GB".to_string(),
        }
    }

    #[test]
    fn demo_devices_are_seeded_in_order() {
        let store = DeviceStore::with_demo_devices();
        let devices = store.get_all().unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "1");
        assert_eq!(devices[0].name, "iPhone 13");
        assert_eq!(devices[1].model, "SM-G991U");
        assert!(DeviceStore::new().get_all().unwrap().is_empty());
    }

    #[test]
    fn create_then_get() {
        let store = DeviceStore::new();
        let device = store.create(new_device("Pixel 8")).unwrap();

        assert!(!device.id.is_empty());
        assert_eq!(store.get_by_id(&device.id).unwrap(), Some(device));
        assert_eq!(store.get_by_id("missing").unwrap(), None);
    }

    #[test]
    fn create_requires_all_fields() {
        let store = DeviceStore::new();
        let err = store
            .create(NewDevice {
                model: String::new(),
                ..new_device("Pixel 8")
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid input: Model is required");
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn listing_keeps_insertion_order() {
        let store = DeviceStore::with_demo_devices();
        let created = store.create(new_device("Nokia 3310")).unwrap();

        let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string(), created.id]);
    }

    #[test]
    fn update_is_partial() {
        let store = DeviceStore::with_demo_devices();
        let updated = store
            .update(
                "1",
                DevicePatch {
                    storage: Some("512GB".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.storage, "512GB");
        assert_eq!(updated.name, "iPhone 13");
        assert_eq!(store.get_by_id("1").unwrap(), Some(updated));
    }

    #[test]
    fn update_missing_and_empty_patch() {
        let store = DeviceStore::with_demo_devices();
        let before = store.get_by_id("2").unwrap();

        assert_eq!(store.update("2", DevicePatch::default()).unwrap(), before);
        assert_eq!(store.update("9", DevicePatch::default()).unwrap(), None);
    }

    #[test]
    fn blank_patch_field_is_rejected() {
        let store = DeviceStore::with_demo_devices();
        assert!(store
            .update(
                "1",
                DevicePatch {
                    name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .is_err());
        assert_eq!(store.get_by_id("1").unwrap().unwrap().name, "iPhone 13");
    }

    #[test]
    fn delete_then_missing() {
        let store = DeviceStore::with_demo_devices();

        assert!(store.delete("1").unwrap());
        assert!(!store.delete("1").unwrap());
        assert_eq!(store.get_by_id("1").unwrap(), None);

        let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["2".to_string()]);
    }

    #[test]
    fn clones_share_the_collection() {
        let store = DeviceStore::new();
        let other = store.clone();
        let device = store.create(new_device("Shared")).unwrap();

        assert_eq!(other.get_by_id(&device.id).unwrap(), Some(device));
    }
}
