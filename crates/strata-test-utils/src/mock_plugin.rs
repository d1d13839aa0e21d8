// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted plugin modules and instances for deterministic loader tests.
//!
//! A [`MockModule`] can import cleanly, fail, or panic. Each of its exports
//! declares a set of contracts, provides a (possibly different) set, and has
//! a factory that succeeds, fails or panics. Every factory call is recorded
//! in a shared [`CreationLog`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use strata_core::{
    ArgSpec, Contract, DataItem, DataModel, DataModelAdapter, ExtractionAdapter, PluginAdapter,
    PostProcessingAdapter, StorageAdapter, StrataError, ValidationAdapter,
};
use strata_plugin::{PluginExport, PluginModule};

/// How an import or a factory call behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Fail(String),
    Panic(String),
}

/// One recorded factory call.
#[derive(Debug, Clone, PartialEq)]
pub struct Creation {
    pub symbol: String,
    pub args: ArgSpec,
}

/// Shared record of factory calls across imports.
#[derive(Debug, Clone, Default)]
pub struct CreationLog(Arc<Mutex<Vec<Creation>>>);

impl CreationLog {
    pub fn creations(&self) -> Vec<Creation> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.0.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn record(&self, symbol: &str, args: &ArgSpec) {
        if let Ok(mut creations) = self.0.lock() {
            creations.push(Creation {
                symbol: symbol.to_string(),
                args: args.clone(),
            });
        }
    }
}

/// Items written through a mock storage instance, as `(model, items)`.
pub type StoredBatches = Arc<tokio::sync::Mutex<Vec<(String, Vec<DataItem>)>>>;

/// An export of a [`MockModule`].
#[derive(Debug, Clone)]
pub struct MockExport {
    pub symbol: String,
    pub declares: Vec<Contract>,
    pub provides: Vec<Contract>,
    pub factory: Outcome,
}

/// A compiled-in module with scripted behavior.
#[derive(Debug, Clone)]
pub struct MockModule {
    import: Outcome,
    exports: Vec<MockExport>,
    log: CreationLog,
    stored: StoredBatches,
}

impl Default for MockModule {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModule {
    /// A module that imports cleanly and has no exports yet.
    pub fn new() -> Self {
        Self {
            import: Outcome::Succeed,
            exports: Vec::new(),
            log: CreationLog::default(),
            stored: StoredBatches::default(),
        }
    }

    /// A module whose import returns an error.
    pub fn failing_import(message: &str) -> Self {
        Self {
            import: Outcome::Fail(message.to_string()),
            ..Self::new()
        }
    }

    /// A module whose import panics.
    pub fn panicking_import(message: &str) -> Self {
        Self {
            import: Outcome::Panic(message.to_string()),
            ..Self::new()
        }
    }

    /// Add an export that declares and provides `contracts`.
    pub fn export(self, symbol: &str, contracts: &[Contract]) -> Self {
        self.export_with(symbol, contracts, contracts, Outcome::Succeed)
    }

    /// Add an export whose live instance provides fewer contracts than declared.
    pub fn export_lying(self, symbol: &str, declares: &[Contract], provides: &[Contract]) -> Self {
        self.export_with(symbol, declares, provides, Outcome::Succeed)
    }

    /// Add an export whose factory returns an error.
    pub fn failing_factory(self, symbol: &str, contracts: &[Contract], message: &str) -> Self {
        self.export_with(symbol, contracts, contracts, Outcome::Fail(message.to_string()))
    }

    /// Add an export whose factory panics.
    pub fn panicking_factory(self, symbol: &str, contracts: &[Contract], message: &str) -> Self {
        self.export_with(symbol, contracts, contracts, Outcome::Panic(message.to_string()))
    }

    pub fn export_with(
        mut self,
        symbol: &str,
        declares: &[Contract],
        provides: &[Contract],
        factory: Outcome,
    ) -> Self {
        self.exports.push(MockExport {
            symbol: symbol.to_string(),
            declares: declares.to_vec(),
            provides: provides.to_vec(),
            factory,
        });
        self
    }

    /// Handle on the factory calls made through this module.
    pub fn log(&self) -> CreationLog {
        self.log.clone()
    }

    /// Batches written by storage instances created from this module.
    pub fn stored(&self) -> StoredBatches {
        Arc::clone(&self.stored)
    }

    pub fn build(self) -> Arc<dyn PluginModule> {
        Arc::new(self)
    }
}

impl PluginModule for MockModule {
    fn import(&self) -> Result<Vec<PluginExport>, StrataError> {
        match &self.import {
            Outcome::Succeed => {}
            Outcome::Fail(message) => return Err(StrataError::Internal(message.clone())),
            Outcome::Panic(message) => panic!("{message}"),
        }

        Ok(self
            .exports
            .iter()
            .cloned()
            .map(|export| {
                let log = self.log.clone();
                let stored = Arc::clone(&self.stored);
                let declares = export.declares.clone();
                PluginExport::new(
                    export.symbol.clone(),
                    &declares,
                    move |args: &ArgSpec| -> Result<Arc<dyn PluginAdapter>, StrataError> {
                        log.record(&export.symbol, args);
                        match &export.factory {
                            Outcome::Succeed => Ok(Arc::new(MockPlugin {
                                name: export.symbol.clone(),
                                contracts: export.provides.clone(),
                                args: args.clone(),
                                stored: Arc::clone(&stored),
                            })),
                            Outcome::Fail(message) => Err(StrataError::Internal(message.clone())),
                            Outcome::Panic(message) => panic!("{message}"),
                        }
                    },
                )
            })
            .collect())
    }
}

/// A plugin instance providing a configurable subset of the contracts.
///
/// Stages pass items through unchanged; storage appends them to a shared list.
#[derive(Debug, Clone)]
pub struct MockPlugin {
    pub name: String,
    pub contracts: Vec<Contract>,
    /// Arguments the instance was constructed with.
    pub args: ArgSpec,
    stored: StoredBatches,
}

impl MockPlugin {
    pub fn new(name: &str, contracts: &[Contract]) -> Self {
        Self {
            name: name.to_string(),
            contracts: contracts.to_vec(),
            args: ArgSpec::None,
            stored: StoredBatches::default(),
        }
    }

    pub fn stored(&self) -> StoredBatches {
        Arc::clone(&self.stored)
    }

    fn has(&self, contract: Contract) -> bool {
        self.contracts.contains(&contract)
    }
}

impl PluginAdapter for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn as_data_model(&self) -> Option<&dyn DataModelAdapter> {
        self.has(Contract::DataModel).then_some(self as &dyn DataModelAdapter)
    }

    fn as_extraction(&self) -> Option<&dyn ExtractionAdapter> {
        self.has(Contract::Extraction).then_some(self as &dyn ExtractionAdapter)
    }

    fn as_post_processing(&self) -> Option<&dyn PostProcessingAdapter> {
        self.has(Contract::PostProcessing)
            .then_some(self as &dyn PostProcessingAdapter)
    }

    fn as_validation(&self) -> Option<&dyn ValidationAdapter> {
        self.has(Contract::Validation).then_some(self as &dyn ValidationAdapter)
    }

    fn as_storage(&self) -> Option<&dyn StorageAdapter> {
        self.has(Contract::Storage).then_some(self as &dyn StorageAdapter)
    }
}

impl DataModelAdapter for MockPlugin {
    fn data_models(&self) -> Vec<DataModel> {
        vec![DataModel {
            name: format!("{}-model", self.name),
            schema: json!({ "id": "string" }),
        }]
    }
}

#[async_trait]
impl ExtractionAdapter for MockPlugin {
    fn can_extract(&self, _model_name: &str, _schema: &Value) -> bool {
        true
    }

    async fn extract(&self, _model_name: &str, _schema: &Value) -> Result<Vec<DataItem>, StrataError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PostProcessingAdapter for MockPlugin {
    fn can_post_process(&self, _model_name: &str, _schema: &Value) -> bool {
        true
    }

    async fn post_process(
        &self,
        items: Vec<DataItem>,
        _model_name: &str,
        _schema: &Value,
    ) -> Result<Vec<DataItem>, StrataError> {
        Ok(items)
    }
}

#[async_trait]
impl ValidationAdapter for MockPlugin {
    fn can_validate(&self, _model_name: &str, _schema: &Value) -> bool {
        true
    }

    async fn validate(
        &self,
        items: Vec<DataItem>,
        _model_name: &str,
        _schema: &Value,
    ) -> Result<Vec<DataItem>, StrataError> {
        Ok(items)
    }
}

#[async_trait]
impl StorageAdapter for MockPlugin {
    fn can_store(&self, _model_name: &str, _schema: &Value) -> bool {
        true
    }

    async fn store(&self, items: &[DataItem], model_name: &str, _schema: &Value) -> Result<(), StrataError> {
        self.stored
            .lock()
            .await
            .push((model_name.to_string(), items.to_vec()));
        Ok(())
    }
}
