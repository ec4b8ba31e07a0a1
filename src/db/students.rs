use anyhow::{Context, Result};
use rusqlite::params;
use tracing::{debug, info, warn};

use crate::models::Student;
use crate::validation::validate;

use super::connection::RecordStore;

/// Result of a write addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A row with that id existed and was written.
    Applied,
    /// No row has that id. Nothing was written.
    NotFound,
}

impl Change {
    fn from_rows(rows: usize) -> Self {
        if rows == 0 {
            Change::NotFound
        } else {
            Change::Applied
        }
    }
}

impl RecordStore {
    /// Every student in storage order. No sort is imposed.
    pub fn list_all(&self) -> Result<Vec<Student>> {
        let conn = self.connect()?;
        debug!("listing students");
        let mut stmt = conn
            .prepare("SELECT id, name, course, mobile FROM students")
            .context("failed to prepare student query")?;

        let students = stmt
            .query_map([], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    course: row.get(2)?,
                    mobile: row.get(3)?,
                })
            })
            .context("failed to load students")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect students")?;

        debug!(count = students.len(), "loaded students");
        Ok(students)
    }

    /// Insert a new student and return the id SQLite assigned. Empty fields
    /// are rejected with a [`crate::ValidationError`] before the database is
    /// opened.
    pub fn insert(&self, name: &str, course: &str, mobile: &str) -> Result<i64> {
        validate(name, course, mobile)?;

        let conn = self.connect()?;
        debug!("inserting student");
        conn.execute(
            "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3)",
            params![name, course, mobile],
        )
        .context("failed to insert student")?;

        let id = conn.last_insert_rowid();
        info!(id, "inserted student");
        Ok(id)
    }

    /// Overwrite the editable fields of `id`. The id itself never changes.
    pub fn update(&self, id: i64, name: &str, course: &str, mobile: &str) -> Result<Change> {
        validate(name, course, mobile)?;

        let conn = self.connect()?;
        debug!(id, "updating student");
        let updated = conn
            .execute(
                "UPDATE students SET name = ?1, course = ?2, mobile = ?3 WHERE id = ?4",
                params![name, course, mobile, id],
            )
            .context("failed to update student")?;

        let change = Change::from_rows(updated);
        match change {
            Change::Applied => info!(id, "updated student"),
            Change::NotFound => warn!(id, "update matched no student"),
        }
        Ok(change)
    }

    pub fn delete(&self, id: i64) -> Result<Change> {
        let conn = self.connect()?;
        debug!(id, "deleting student");
        let deleted = conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .context("failed to delete student")?;

        let change = Change::from_rows(deleted);
        match change {
            Change::Applied => info!(id, "deleted student"),
            Change::NotFound => warn!(id, "delete matched no student"),
        }
        Ok(change)
    }
}
