// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline registry: the per-category ordered plugin instances produced by a load.
//!
//! One stage per capability category, in capability-registry order. Within a
//! stage, plugins are ordered by the configured ranking and then by
//! discovery order. The registry is handed to the execution driver and is
//! never mutated by the loader afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use strata_core::{
    Contract, DataModelAdapter, ExtractionAdapter, PluginAdapter, PostProcessingAdapter,
    StorageAdapter, ValidationAdapter,
};

use crate::policy::Ranking;

/// A live plugin instance bound to one category.
#[derive(Clone)]
pub struct RegisteredPlugin {
    /// Plugin name from the descriptor.
    pub name: String,
    pub version: semver::Version,
    /// Export symbol the instance was built from.
    pub symbol: String,
    pub category: String,
    /// Position of the candidate in the discovery pass.
    pub discovery_index: usize,
    pub instance: Arc<dyn PluginAdapter>,
}

impl std::fmt::Debug for RegisteredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPlugin")
            .field("name", &self.name)
            .field("version", &self.version.to_string())
            .field("symbol", &self.symbol)
            .field("category", &self.category)
            .field("discovery_index", &self.discovery_index)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct Stage {
    category: String,
    contract: Contract,
    plugins: Vec<RegisteredPlugin>,
}

/// Ordered plugin instances keyed by category.
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    stages: Vec<Stage>,
}

impl PipelineRegistry {
    /// An empty registry with one stage per `(category, contract)` binding.
    pub fn with_stages<'a, I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Contract)>,
    {
        Self {
            stages: bindings
                .into_iter()
                .map(|(category, contract)| Stage {
                    category: category.to_string(),
                    contract,
                    plugins: Vec::new(),
                })
                .collect(),
        }
    }

    /// Plugins bound to `category` in execution order. Empty for unknown categories.
    pub fn get(&self, category: &str) -> &[RegisteredPlugin] {
        self.stage(category)
            .map(|stage| stage.plugins.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_by_name(&self, category: &str, name: &str) -> Option<&RegisteredPlugin> {
        self.get(category).iter().find(|p| p.name == name)
    }

    /// Plugin names bound to `category`, in execution order.
    pub fn names(&self, category: &str) -> Vec<&str> {
        self.get(category).iter().map(|p| p.name.as_str()).collect()
    }

    /// Category names in capability-registry order, including empty stages.
    pub fn categories(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.category.as_str()).collect()
    }

    /// Plugins of the stage bound to `contract`.
    pub fn by_contract(&self, contract: Contract) -> &[RegisteredPlugin] {
        self.stages
            .iter()
            .find(|s| s.contract == contract)
            .map(|s| s.plugins.as_slice())
            .unwrap_or(&[])
    }

    /// Every distinct instance, in discovery order.
    ///
    /// A plugin bound to several categories appears once.
    pub fn all(&self) -> Vec<&RegisteredPlugin> {
        let mut entries: Vec<&RegisteredPlugin> =
            self.stages.iter().flat_map(|s| s.plugins.iter()).collect();
        entries.sort_by_key(|p| p.discovery_index);

        let mut seen = HashSet::new();
        entries.retain(|p| seen.insert(Arc::as_ptr(&p.instance) as *const () as usize));
        entries
    }

    pub fn data_models(&self) -> impl Iterator<Item = &dyn DataModelAdapter> {
        self.by_contract(Contract::DataModel)
            .iter()
            .filter_map(|p| p.instance.as_data_model())
    }

    pub fn extractors(&self) -> impl Iterator<Item = &dyn ExtractionAdapter> {
        self.by_contract(Contract::Extraction)
            .iter()
            .filter_map(|p| p.instance.as_extraction())
    }

    pub fn post_processors(&self) -> impl Iterator<Item = &dyn PostProcessingAdapter> {
        self.by_contract(Contract::PostProcessing)
            .iter()
            .filter_map(|p| p.instance.as_post_processing())
    }

    pub fn validators(&self) -> impl Iterator<Item = &dyn ValidationAdapter> {
        self.by_contract(Contract::Validation)
            .iter()
            .filter_map(|p| p.instance.as_validation())
    }

    pub fn storages(&self) -> impl Iterator<Item = &dyn StorageAdapter> {
        self.by_contract(Contract::Storage)
            .iter()
            .filter_map(|p| p.instance.as_storage())
    }

    /// Total number of category bindings.
    pub fn len(&self) -> usize {
        self.stages.iter().map(|s| s.plugins.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&mut self, plugin: RegisteredPlugin) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.category == plugin.category) {
            stage.plugins.push(plugin);
        }
    }

    /// Stable sort of one stage by rank, then discovery order.
    pub(crate) fn sort_stage(&mut self, category: &str, ranking: &Ranking<'_>) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.category == category) {
            stage
                .plugins
                .sort_by_key(|p| (ranking.rank(&p.name), p.discovery_index));
        }
    }

    fn stage(&self, category: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityRegistry;
    use crate::policy::PolicyEngine;
    use proptest::prelude::*;
    use strata_config::load_config_from_str;
    use strata_core::{DataItem, StrataError};

    struct Named(&'static str);

    impl PluginAdapter for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }

        fn as_validation(&self) -> Option<&dyn ValidationAdapter> {
            Some(self)
        }
    }

    #[async_trait::async_trait]
    impl ValidationAdapter for Named {
        fn can_validate(&self, _model_name: &str, _schema: &serde_json::Value) -> bool {
            true
        }

        async fn validate(
            &self,
            items: Vec<DataItem>,
            _model_name: &str,
            _schema: &serde_json::Value,
        ) -> Result<Vec<DataItem>, StrataError> {
            Ok(items)
        }
    }

    fn entry(name: &'static str, category: &str, index: usize) -> RegisteredPlugin {
        RegisteredPlugin {
            name: name.to_string(),
            version: semver::Version::new(0, 1, 0),
            symbol: name.to_string(),
            category: category.to_string(),
            discovery_index: index,
            instance: Arc::new(Named(name)),
        }
    }

    fn builtin_registry() -> PipelineRegistry {
        PipelineRegistry::with_stages(CapabilityRegistry::builtin().iter())
    }

    #[test]
    fn push_and_get_roundtrip() {
        let mut registry = builtin_registry();
        registry.push(entry("schema", "Validation", 0));

        assert_eq!(registry.names("Validation"), vec!["schema"]);
        assert!(registry.get_by_name("Validation", "schema").is_some());
        assert!(registry.get_by_name("Validation", "other").is_none());
        assert!(registry.get("Storage").is_empty());
        assert!(registry.get("Nope").is_empty());
    }

    #[test]
    fn push_to_unknown_category_is_dropped() {
        let mut registry = builtin_registry();
        registry.push(entry("x", "Nope", 0));
        assert!(registry.is_empty());
    }

    #[test]
    fn sort_stage_uses_rank_then_discovery() {
        let config = load_config_from_str("[plugin_order]\nValidation = [\"B\", \"A\"]\n").unwrap();
        let policy = PolicyEngine::new(&config, &CapabilityRegistry::builtin()).unwrap();

        let mut registry = builtin_registry();
        registry.push(entry("A", "Validation", 0));
        registry.push(entry("B", "Validation", 1));
        registry.push(entry("D", "Validation", 2));
        registry.push(entry("C", "Validation", 3));
        registry.sort_stage("Validation", &policy.ordering("Validation"));

        assert_eq!(registry.names("Validation"), vec!["B", "A", "D", "C"]);
    }

    #[test]
    fn all_dedupes_shared_instances() {
        let shared: Arc<dyn PluginAdapter> = Arc::new(Named("multi"));
        let mut registry = builtin_registry();
        for category in ["Validation", "Storage"] {
            registry.push(RegisteredPlugin {
                name: "multi".to_string(),
                version: semver::Version::new(1, 0, 0),
                symbol: "Multi".to_string(),
                category: category.to_string(),
                discovery_index: 1,
                instance: Arc::clone(&shared),
            });
        }
        registry.push(entry("first", "Validation", 0));

        let all: Vec<&str> = registry.all().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(all, vec!["first", "multi"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn typed_accessors_filter_by_contract() {
        let mut registry = builtin_registry();
        registry.push(entry("schema", "Validation", 0));
        assert_eq!(registry.validators().count(), 1);
        assert_eq!(registry.storages().count(), 0);
        assert_eq!(registry.by_contract(Contract::Validation).len(), 1);
    }

    #[test]
    fn categories_follow_binding_order() {
        let registry = PipelineRegistry::with_stages(
            CapabilityRegistry::from_pairs([("Sink", Contract::Storage), ("Check", Contract::Validation)])
                .unwrap()
                .iter(),
        );
        assert_eq!(registry.categories(), vec!["Sink", "Check"]);
    }

    #[test]
    fn len_and_is_empty() {
        let mut registry = builtin_registry();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.push(entry("test", "Validation", 0));
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }

    const POOL: [&str; 8] = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn sort_stage_is_a_stable_sort_by_rank(
            count in 1..=POOL.len(),
            order in proptest::sample::subsequence((0..POOL.len()).collect::<Vec<_>>(), 0..=POOL.len())
                .prop_shuffle(),
        ) {
            let listed: Vec<String> = order.iter().map(|i| format!("\"{}\"", POOL[*i])).collect();
            let config =
                load_config_from_str(&format!("[plugin_order]\nValidation = [{}]\n", listed.join(", ")))
                    .unwrap();
            let policy = PolicyEngine::new(&config, &CapabilityRegistry::builtin()).unwrap();

            let mut registry = builtin_registry();
            for (index, name) in POOL.iter().take(count).enumerate() {
                registry.push(entry(*name, "Validation", index));
            }
            registry.sort_stage("Validation", &policy.ordering("Validation"));

            let ranked: Vec<&str> = order.iter().filter(|i| **i < count).map(|i| POOL[*i]).collect();
            let unranked = POOL.iter().take(count).copied().filter(|name| !ranked.contains(name));
            let expected: Vec<&str> = ranked.iter().copied().chain(unranked).collect();
            prop_assert_eq!(registry.names("Validation"), expected);
        }
    }
}
