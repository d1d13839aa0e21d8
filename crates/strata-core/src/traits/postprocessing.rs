// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-processing contract for transforming extracted items.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StrataError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DataItem;

#[async_trait]
pub trait PostProcessingAdapter: PluginAdapter {
    fn can_post_process(&self, model_name: &str, schema: &Value) -> bool;

    /// Transforms the items, returning the items handed to the next stage.
    async fn post_process(
        &self,
        items: Vec<DataItem>,
        model_name: &str,
        schema: &Value,
    ) -> Result<Vec<DataItem>, StrataError>;
}
