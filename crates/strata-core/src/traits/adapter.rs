// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every plugin instance implements.

use crate::traits::{
    DataModelAdapter, ExtractionAdapter, PostProcessingAdapter, StorageAdapter, ValidationAdapter,
};
use crate::types::Contract;

/// The base trait for all Strata plugin instances.
///
/// A single instance may satisfy several contracts. Each `as_*` accessor
/// defaults to `None`; an implementation overrides the accessors for the
/// contracts it provides and returns `Some(self)`. The loader uses these
/// accessors to verify a declared contract against the live instance.
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this plugin instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this plugin.
    fn version(&self) -> semver::Version;

    fn as_data_model(&self) -> Option<&dyn DataModelAdapter> {
        None
    }

    fn as_extraction(&self) -> Option<&dyn ExtractionAdapter> {
        None
    }

    fn as_post_processing(&self) -> Option<&dyn PostProcessingAdapter> {
        None
    }

    fn as_validation(&self) -> Option<&dyn ValidationAdapter> {
        None
    }

    fn as_storage(&self) -> Option<&dyn StorageAdapter> {
        None
    }

    /// Returns true if this instance provides the given contract.
    fn provides(&self, contract: Contract) -> bool {
        match contract {
            Contract::DataModel => self.as_data_model().is_some(),
            Contract::Extraction => self.as_extraction().is_some(),
            Contract::PostProcessing => self.as_post_processing().is_some(),
            Contract::Validation => self.as_validation().is_some(),
            Contract::Storage => self.as_storage().is_some(),
        }
    }
}
