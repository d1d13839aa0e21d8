// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: opening, pragmas and migrations.
//!
//! Every query goes through the single `tokio_rusqlite` background thread
//! owned by [`Database`]. Do not open extra connections for writes.

use std::path::{Path, PathBuf};

use strata_core::StrataError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into `StrataError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> StrataError {
    StrataError::Storage {
        source: Box::new(e),
    }
}

fn storage_err<E>(e: E) -> StrataError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StrataError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    path: PathBuf,
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply migrations.
    ///
    /// Migrations run on a short-lived blocking connection before the async
    /// connection is opened.
    pub async fn open(path: &Path) -> Result<Self, StrataError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let migrate_path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<(), StrataError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(storage_err)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
                .map_err(storage_err)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| StrataError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(storage_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path.display(), "storage database opened");
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/records.db");
        let db = Database::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path);
    }

    #[tokio::test]
    async fn reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        drop(Database::open(&path).await.unwrap());
        let db = Database::open(&path).await.unwrap();

        let tables: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE name = 'storage'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(tables, 1);
    }
}
