//! Durable string-keyed JSON blob store, one SQLite table per workspace.
//!
//! Serialization happens behind the connection mutex: an `update` runs its
//! read-modify-write as one transaction, so no other writer interleaves on
//! the same key between the read and the write.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Result, StoreError};

pub const STUDENTS_KEY: &str = "all_students";
pub const TASKS_KEY: &str = "all_tasks";
pub const ASSIGNMENTS_KEY: &str = "station_assignments";
pub const PASSED_TASKS_KEY: &str = "passed_tasks";

pub struct BlobStore {
    conn: Mutex<Connection>,
}

pub fn open_store(workspace: &Path) -> anyhow::Result<BlobStore> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("session.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    Ok(BlobStore {
        conn: Mutex::new(conn),
    })
}

impl BlobStore {
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row("SELECT value FROM documents WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(db_err)
    }

    /// Atomic read-modify-write of one key. The closure receives the current
    /// blob (if any) and returns the replacement blob plus a caller value;
    /// a closure error aborts the transaction with nothing written.
    pub fn update<R>(
        &self,
        key: &str,
        f: impl FnOnce(Option<String>) -> Result<(String, R)>,
    ) -> Result<R> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;

        let current: Option<String> = tx
            .query_row("SELECT value FROM documents WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(db_err)?;

        let (next, out) = f(current)?;

        tx.execute(
            "INSERT INTO documents(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, next.as_str()),
        )
        .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        Ok(out)
    }

    /// Read several keys in one transaction. Reports built from this never
    /// observe a torn mix of pre/post states from a concurrent mutation.
    pub fn snapshot(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let value: Option<String> = tx
                .query_row("SELECT value FROM documents WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(db_err)?;
            values.push(value);
        }
        Ok(values)
    }

    /// Drop every key in a single statement; no partial-clear state is
    /// observable.
    pub fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents", []).map_err(db_err)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Persist(anyhow::anyhow!("blob store mutex poisoned")))
    }
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Persist(e.into())
}
