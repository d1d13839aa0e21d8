// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference storage plugin for Strata.
//!
//! `sqlite-flat` persists data items as JSON in a single SQLite table with
//! embedded migrations and a single-writer `tokio-rusqlite` connection. A
//! record gets a new version only when its content fingerprint changes.

pub mod adapter;
pub mod database;
pub mod fingerprint;
pub mod migrations;
pub mod models;
pub mod plugin;
pub mod queries;

pub use adapter::{DEFAULT_DATABASE_PATH, PLUGIN_NAME, SqliteFlatStorage};
pub use database::Database;
pub use fingerprint::fingerprint;
pub use models::{PendingRecord, StoredRecord};
pub use plugin::{MODULE_NAME, register, sqlite_flat_module};
