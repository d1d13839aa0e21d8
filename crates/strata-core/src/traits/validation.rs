// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StrataError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DataItem;

/// Filters out items that do not satisfy a data model.
#[async_trait]
pub trait ValidationAdapter: PluginAdapter {
    fn can_validate(&self, model_name: &str, schema: &Value) -> bool;

    /// Returns the items that passed validation, in input order.
    async fn validate(
        &self,
        items: Vec<DataItem>,
        model_name: &str,
        schema: &Value,
    ) -> Result<Vec<DataItem>, StrataError>;
}
