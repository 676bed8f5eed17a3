//! SQLite-backed task store.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::schema::{lock, SharedConnection};
use super::update::UpdateBuilder;
use crate::models::{NewTask, Task, TaskPatch};
use crate::store::ResourceStore;
use crate::{Result, TaskboardError};

const SELECT_TASK: &str = "SELECT id, title, description, completed, created_at FROM tasks";

/// Task storage operations for SQLite
#[derive(Clone)]
pub struct TaskStore {
    conn: SharedConnection,
}

impl TaskStore {
    /// Creates a store over an already-initialized connection
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let created_ms: i64 = row.get(4)?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, created_ms))?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at,
    })
}

fn select_by_id(conn: &Connection, id: &str) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_TASK),
            [id],
            row_to_task,
        )
        .optional()?;
    Ok(task)
}

impl ResourceStore for TaskStore {
    type Record = Task;
    type Draft = NewTask;
    type Patch = TaskPatch;

    /// Newest first. Rows inserted within the same millisecond keep
    /// insertion order via `rowid`.
    fn get_all(&self) -> Result<Vec<Task>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, rowid DESC",
            SELECT_TASK
        ))?;

        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Task>> {
        let conn = lock(&self.conn)?;
        select_by_id(&conn, id)
    }

    fn create(&self, draft: NewTask) -> Result<Task> {
        draft.validate()?;

        let conn = lock(&self.conn)?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO tasks (id, title, description, completed) VALUES (?1, ?2, ?3, ?4)",
            params![id, draft.title, draft.description, draft.completed],
        )?;
        debug!("Created task: {}", id);

        // Read back so server-side defaults (created_at) are included
        select_by_id(&conn, &id)?
            .ok_or_else(|| TaskboardError::from(rusqlite::Error::QueryReturnedNoRows))
    }

    fn update(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        patch.validate()?;

        let conn = lock(&self.conn)?;
        let Some(stmt) = UpdateBuilder::from(patch).build(id) else {
            return select_by_id(&conn, id);
        };

        let changed = conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
        if changed == 0 {
            return Ok(None);
        }
        debug!("Updated task: {}", id);

        select_by_id(&conn, id)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let removed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if removed > 0 {
            debug!("Deleted task: {}", id);
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use std::collections::HashSet;

    fn store() -> TaskStore {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        TaskStore::new(db.shared())
    }

    #[test]
    fn create_assigns_id_and_defaults() {
        let store = store();
        let task = store.create(NewTask::new("Buy milk")).unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert!(!task.completed);
    }

    #[test]
    fn create_keeps_supplied_fields() {
        let store = store();
        let task = store
            .create(
                NewTask::new("Ship release")
                    .with_description("tag and publish")
                    .with_completed(true),
            )
            .unwrap();

        assert_eq!(task.description, "tag and publish");
        assert!(task.completed);
    }

    #[test]
    fn ids_are_unique() {
        let store = store();
        let ids: HashSet<String> = (0..50)
            .map(|i| store.create(NewTask::new(format!("t{}", i))).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn blank_title_is_rejected_before_insert() {
        let store = store();
        let err = store.create(NewTask::new("  \t")).unwrap_err();

        assert!(matches!(err, TaskboardError::InvalidInput(_)));
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn round_trip_by_id() {
        let store = store();
        let created = store
            .create(NewTask::new("Read").with_description("chapter 3"))
            .unwrap();

        assert_eq!(store.get_by_id(&created.id).unwrap(), Some(created));
    }

    #[test]
    fn missing_id_is_none() {
        let store = store();
        assert_eq!(store.get_by_id("nope").unwrap(), None);
    }

    #[test]
    fn empty_collection_lists_nothing() {
        assert!(store().get_all().unwrap().is_empty());
    }

    #[test]
    fn listing_is_newest_first() {
        let store = store();
        let a = store.create(NewTask::new("A")).unwrap();
        let b = store.create(NewTask::new("B")).unwrap();
        let c = store.create(NewTask::new("C")).unwrap();

        let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn partial_update_touches_only_supplied_field() {
        let store = store();
        let original = store
            .create(NewTask::new("X").with_description("keep me"))
            .unwrap();

        let updated = store
            .update(
                &original.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(
            updated,
            Task {
                completed: true,
                ..original
            }
        );
    }

    #[test]
    fn update_several_fields() {
        let store = store();
        let original = store.create(NewTask::new("Old")).unwrap();

        let updated = store
            .update(
                &original.id,
                TaskPatch {
                    title: Some("New".to_string()),
                    description: Some("details".to_string()),
                    completed: None,
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, "details");
        assert!(!updated.completed);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(store.get_by_id(&original.id).unwrap(), Some(updated));
    }

    #[test]
    fn update_missing_id_is_none() {
        let store = store();
        let result = store
            .update(
                "ghost",
                TaskPatch {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn empty_patch_returns_current_record() {
        let store = store();
        let original = store.create(NewTask::new("Stay")).unwrap();

        assert_eq!(
            store.update(&original.id, TaskPatch::default()).unwrap(),
            Some(original)
        );
        assert_eq!(store.update("ghost", TaskPatch::default()).unwrap(), None);
    }

    #[test]
    fn blank_title_patch_is_rejected_and_row_unchanged() {
        let store = store();
        let original = store.create(NewTask::new("Keep")).unwrap();

        let err = store
            .update(
                &original.id,
                TaskPatch {
                    title: Some(" ".to_string()),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, TaskboardError::InvalidInput(_)));
        assert_eq!(store.get_by_id(&original.id).unwrap(), Some(original));
    }

    #[test]
    fn hostile_values_are_stored_verbatim() {
        let store = store();
        let task = store.create(NewTask::new("safe")).unwrap();
        let hostile = "'; DROP TABLE tasks; --".to_string();

        let updated = store
            .update(
                &task.id,
                TaskPatch {
                    description: Some(hostile.clone()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.description, hostile);
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_reports_existence() {
        let store = store();
        let task = store.create(NewTask::new("Gone soon")).unwrap();

        assert!(store.delete(&task.id).unwrap());
        assert_eq!(store.get_by_id(&task.id).unwrap(), None);
        assert!(!store.delete(&task.id).unwrap());
        assert!(!store.delete("never-existed").unwrap());
    }

    #[test]
    fn last_writer_wins() {
        let store = store();
        let task = store.create(NewTask::new("race")).unwrap();

        let handles: Vec<_> = ["one", "two"]
            .into_iter()
            .map(|title| {
                let store = store.clone();
                let id = task.id.clone();
                std::thread::spawn(move || {
                    store
                        .update(
                            &id,
                            TaskPatch {
                                title: Some(title.to_string()),
                                ..Default::default()
                            },
                        )
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }

        let final_title = store.get_by_id(&task.id).unwrap().unwrap().title;
        assert!(final_title == "one" || final_title == "two");
    }
}
