// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strata plugin pipeline.
//!
//! `Config` and `Discovery` are fatal and abort a run. `Import` and
//! `Instantiation` are local to a single candidate or category binding: the
//! loader attaches them to the affected `PluginInfo` and carries on.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across contracts, discovery and loading.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Malformed policy configuration (unknown mode, bad argument shape, unknown category).
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem enumeration of a plugin root failed.
    #[error("discovery failed at {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A candidate's code unit could not be imported.
    #[error("unable to import plugin module `{module}`: {message}")]
    Import { module: String, message: String },

    /// A plugin could not be constructed for a category binding.
    #[error("unable to create plugin `{plugin}` for category `{category}`: {message}")]
    Instantiation {
        category: String,
        plugin: String,
        message: String,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Returns true for error classes that abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StrataError::Config(_) | StrataError::Discovery { .. })
    }
}
