use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, OpenFlags};
use tracing::info;

/// Handle to the students database file. It only remembers the path: every
/// operation opens its own connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open (creating if needed) the database file and make sure the
    /// `students` table exists. Any failure here is fatal for the caller.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(anyhow!("database path is empty"));
        }
        if path.is_dir() {
            return Err(anyhow!("database path {} is a directory", path.display()));
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
        ensure_schema(&conn)?;
        info!(path = %path.display(), "record store ready");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a short-lived connection for a single statement. The file must
    /// already exist; a database removed after startup is reported rather than
    /// silently recreated empty.
    pub(crate) fn connect(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open SQLite database at {}", self.path.display()))
    }
}

/// Create the `students` table when it is missing. `AUTOINCREMENT` keeps ids
/// of deleted rows from being handed out again.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            course TEXT NOT NULL,
            mobile TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create students table")?;
    Ok(())
}
