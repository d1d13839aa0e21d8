// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage contract for the final persistence stage.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StrataError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DataItem;

/// Adapter for persistence backends.
///
/// Whether a backend versions or deduplicates what it writes is a property
/// of the backend, not of this contract.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Pure predicate: can this backend store items of the given model?
    fn can_store(&self, model_name: &str, schema: &Value) -> bool;

    /// Persists the items of one data model.
    async fn store(
        &self,
        items: &[DataItem],
        model_name: &str,
        schema: &Value,
    ) -> Result<(), StrataError>;
}
