//! The CRUD contract shared by every resource store.

use crate::Result;

/// Owner of one entity collection.
///
/// Stores are the only code allowed to mutate their collection; callers go
/// through these five operations and never hold a reference into it.
pub trait ResourceStore: Send + Sync {
    type Record;
    type Draft;
    type Patch;

    /// All records. An empty collection yields an empty vector.
    fn get_all(&self) -> Result<Vec<Self::Record>>;

    /// The record with `id`, or `None`.
    fn get_by_id(&self, id: &str) -> Result<Option<Self::Record>>;

    /// Assigns a fresh id and returns the record as stored.
    fn create(&self, draft: Self::Draft) -> Result<Self::Record>;

    /// Applies only the fields present in `patch` and returns the full
    /// record afterwards. `None` means no record has this id. An empty patch
    /// changes nothing and returns the current record.
    fn update(&self, id: &str, patch: Self::Patch) -> Result<Option<Self::Record>>;

    /// Removes the record permanently. Returns false if it did not exist.
    fn delete(&self, id: &str) -> Result<bool>;
}
