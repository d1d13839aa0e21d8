// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction contract for pulling records out of a source.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StrataError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DataItem;

#[async_trait]
pub trait ExtractionAdapter: PluginAdapter {
    /// Returns true if this plugin can produce items for the given model.
    fn can_extract(&self, model_name: &str, schema: &Value) -> bool;

    /// Extracts items conforming to the given model.
    async fn extract(&self, model_name: &str, schema: &Value)
    -> Result<Vec<DataItem>, StrataError>;
}
