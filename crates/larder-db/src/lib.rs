pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::info;

/// Which table a write touched. Observable repository streams subscribe
/// to these and rebuild their query on a matching change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    SearchCache,
    Categories,
    Bookmarks,
    Recipes,
}

pub struct Database {
    conn: Mutex<Connection>,
    changes: broadcast::Sender<Change>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self::wrap(conn))
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            conn: Mutex::new(conn),
            changes,
        }
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Mutable access, for writes that need a real transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&mut conn)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }

    /// Fire-and-forget: a send with no live subscribers is fine.
    pub(crate) fn notify(&self, change: Change) {
        let _ = self.changes.send(change);
    }
}
