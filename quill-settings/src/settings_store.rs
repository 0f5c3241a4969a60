//! Generic key-value settings table backed by DuckDB.
//!
//! Values are JSON documents stored as TEXT. Writes are unconditional
//! upserts (`INSERT OR REPLACE`), so `set` is idempotent and the last
//! writer wins.

use crate::error::SettingsResult;
use chrono::Utc;
use duckdb::{Connection, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Key-value settings store shared across the backend.
#[derive(Clone)]
pub struct SettingsStore {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsStore {
    /// Opens or creates the settings database at the given path.
    pub fn open(path: &Path) -> SettingsResult<Self> {
        let conn = open_with_wal_recovery(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory settings store (for testing).
    pub fn open_in_memory() -> SettingsResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Upserts a JSON value under `key`.
    pub fn set(&self, key: &str, value: &serde_json::Value) -> SettingsResult<()> {
        let raw = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, raw, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns the value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> SettingsResult<Option<serde_json::Value>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => {
                let raw: String = row.get(0)?;
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    /// Removes `key`. Returns true if a row was deleted.
    pub fn delete(&self, key: &str) -> SettingsResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM settings WHERE key = ?", params![key])?;
        Ok(deleted > 0)
    }
}

/// Open a DuckDB connection, recovering from a stale WAL file.
///
/// An unclean shutdown can leave a `.wal` file that prevents reopening; if
/// the initial open fails and one exists alongside the database, it is
/// removed and the open retried once.
fn open_with_wal_recovery(path: &Path) -> SettingsResult<Connection> {
    let conn = match Connection::open(path) {
        Ok(c) => c,
        Err(first_err) => {
            let wal_path = path.with_extension(
                path.extension()
                    .map(|ext| format!("{}.wal", ext.to_string_lossy()))
                    .unwrap_or_else(|| "wal".to_string()),
            );
            if wal_path.exists() && std::fs::remove_file(&wal_path).is_ok() {
                warn!(
                    "settings database open failed, removed stale WAL and retrying: {}",
                    wal_path.display()
                );
                let c = Connection::open(path)?;
                apply_resource_limits(&c)?;
                return Ok(c);
            }
            return Err(first_err.into());
        }
    };
    apply_resource_limits(&conn)?;
    Ok(conn)
}

/// Cap per-database resource usage. DuckDB defaults to ~80% of system RAM
/// and all cores, far too aggressive for a table of config blobs.
fn apply_resource_limits(conn: &Connection) -> SettingsResult<()> {
    conn.execute_batch("PRAGMA memory_limit='64MB'; PRAGMA threads=1;")?;
    Ok(())
}

fn initialize_schema(conn: &Connection) -> SettingsResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
