// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! The SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and applied whenever a [`Database`](crate::Database) is opened.

use strata_core::StrataError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery records applied versions in `refinery_schema_history`, so
/// reopening an existing database is a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), StrataError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| StrataError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
