//! Database schema and connection management.

use crate::{Result, TaskboardError};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// Current schema version, recorded in `PRAGMA user_version`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// An established connection shared between stores and request handlers.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Opens the SQLite file, applies pragmas and owns the schema.
///
/// Stores never open connections themselves; they are handed
/// [`Database::shared`].
#[derive(Clone)]
pub struct Database {
    conn: SharedConnection,
}

impl Database {
    /// Open a database at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a new in-memory database for testing
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// How long a statement waits on a locked database file before failing.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn()?.busy_timeout(timeout)?;
        Ok(())
    }

    /// Initialize the database schema
    pub fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version > CURRENT_SCHEMA_VERSION {
            return Err(TaskboardError::Corrupt(format!(
                "schema version {} is newer than supported version {}",
                version, CURRENT_SCHEMA_VERSION
            )));
        }

        create_tasks_table(&conn)?;
        create_indexes(&conn)?;
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;

        if version < CURRENT_SCHEMA_VERSION {
            info!("Initialized task schema v{}", CURRENT_SCHEMA_VERSION);
        } else {
            debug!("Task schema already at v{}", version);
        }
        Ok(())
    }

    /// A handle to the underlying connection for building stores
    pub fn shared(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    /// Locks the connection for direct use
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        lock(&self.conn)
    }
}

/// Locks a shared connection. A poisoned lock surfaces as
/// [`TaskboardError::Unavailable`].
pub fn lock(conn: &SharedConnection) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| TaskboardError::Unavailable(format!("Lock error: {}", e)))
}

fn create_tasks_table(conn: &Connection) -> Result<()> {
    // created_at defaults to Unix epoch milliseconds at insert time
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
                DEFAULT (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
        )",
        [],
    )?;
    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    let indexes = ["CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)"];
    for sql in &indexes {
        conn.execute(sql, [])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1")
            .unwrap()
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_in_memory_database() {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();

        let conn = db.conn().unwrap();
        assert!(names(&conn, "table").contains(&"tasks".to_string()));
        assert!(names(&conn, "index").contains(&"idx_tasks_created_at".to_string()));

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn initialize_is_idempotent() {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        db.initialize_schema().unwrap();
    }

    #[test]
    fn created_at_defaults_to_now() {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        let conn = db.conn().unwrap();

        conn.execute("INSERT INTO tasks (id, title) VALUES ('a', 'A')", [])
            .unwrap();
        let created_at: i64 = conn
            .query_row("SELECT created_at FROM tasks WHERE id = 'a'", [], |row| {
                row.get(0)
            })
            .unwrap();

        let now = chrono::Utc::now().timestamp_millis();
        assert!((now - created_at).abs() < 60_000);
    }

    #[test]
    fn rejects_newer_schema() {
        let db = Database::in_memory().unwrap();
        db.conn()
            .unwrap()
            .pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION + 1)
            .unwrap();

        assert!(matches!(
            db.initialize_schema(),
            Err(TaskboardError::Corrupt(_))
        ));
    }

    #[test]
    fn file_database_persists_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        {
            let db = Database::open(&path).unwrap();
            db.set_busy_timeout(Duration::from_millis(500)).unwrap();
            db.initialize_schema().unwrap();
        }

        let db = Database::open(&path).unwrap();
        let conn = db.conn().unwrap();
        assert!(names(&conn, "table").contains(&"tasks".to_string()));
    }
}
