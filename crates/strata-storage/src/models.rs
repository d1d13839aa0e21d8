// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the `storage` table.

use serde::{Deserialize, Serialize};

/// One stored version of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub data_model_name: String,
    pub uid: String,
    /// Starts at 1 and increases by one per content change.
    pub version: i64,
    /// ISO 8601 timestamp.
    pub created: String,
    /// JSON of the data model schema at write time.
    pub data_model: String,
    pub data_item: String,
    pub data_item_metadata: String,
    pub checksum: String,
}

/// A serialized record about to be offered to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub uid: String,
    pub data_item: String,
    pub data_item_metadata: String,
    pub checksum: String,
}
