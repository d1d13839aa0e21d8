// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model contract.

use crate::traits::adapter::PluginAdapter;
use crate::types::DataModel;

/// Supplies the data models the rest of the pipeline operates on.
pub trait DataModelAdapter: PluginAdapter {
    /// Returns the models this plugin defines.
    fn data_models(&self) -> Vec<DataModel>;
}
