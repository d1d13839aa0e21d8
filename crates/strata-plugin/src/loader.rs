// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin loader: turns discovered candidates into a pipeline registry.
//!
//! Candidates are processed one at a time in discovery order. For each one
//! the loader imports its module, binds the first export implementing each
//! category's contract, consults the policy, and instantiates the plugin.
//! Failures local to a candidate or a binding are recorded on that
//! candidate's [`PluginInfo`] and never abort the batch.

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;

use strata_core::{ArgSpec, Contract, PluginAdapter, StrataError};
use tracing::{debug, error, info, warn};

use crate::capability::CapabilityRegistry;
use crate::locator::PluginCandidate;
use crate::module::{ModuleResolver, PluginExport, instantiate, panic_message};
use crate::policy::PolicyEngine;
use crate::registry::{PipelineRegistry, RegisteredPlugin};

/// A successful category binding.
#[derive(Clone)]
pub struct Binding {
    pub category: String,
    pub symbol: String,
    pub instance: Arc<dyn PluginAdapter>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("category", &self.category)
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

/// A category binding whose instantiation failed.
#[derive(Debug)]
pub struct BindingFailure {
    pub category: String,
    pub symbol: String,
    pub error: StrataError,
}

/// Terminal state of one candidate after a load pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginState {
    /// Bound to at least one category.
    Loaded { categories: Vec<String> },
    /// Imported, but bound to no category and no binding failed.
    Ignored,
    ImportFailed,
    /// Every attempted binding failed.
    InstantiationFailed,
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginState::Loaded { categories } => write!(f, "loaded ({})", categories.join(", ")),
            PluginState::Ignored => write!(f, "ignored"),
            PluginState::ImportFailed => write!(f, "import-failed"),
            PluginState::InstantiationFailed => write!(f, "instantiation-failed"),
        }
    }
}

/// Audit record for one candidate.
#[derive(Debug)]
pub struct PluginInfo {
    pub candidate: PluginCandidate,
    /// Synthetic identifier the module was imported under.
    pub module_id: String,
    pub bindings: Vec<Binding>,
    pub import_error: Option<StrataError>,
    pub failures: Vec<BindingFailure>,
}

impl PluginInfo {
    fn pending(candidate: PluginCandidate, module_id: String) -> Self {
        Self {
            candidate,
            module_id,
            bindings: Vec::new(),
            import_error: None,
            failures: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    /// Categories this candidate was bound to, in capability-registry order.
    pub fn categories(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.category.as_str()).collect()
    }

    /// The live instance, shared by every category it is bound to.
    pub fn instance(&self) -> Option<&Arc<dyn PluginAdapter>> {
        self.bindings.first().map(|b| &b.instance)
    }

    pub fn state(&self) -> PluginState {
        if self.import_error.is_some() {
            PluginState::ImportFailed
        } else if !self.bindings.is_empty() {
            PluginState::Loaded {
                categories: self.bindings.iter().map(|b| b.category.clone()).collect(),
            }
        } else if !self.failures.is_empty() {
            PluginState::InstantiationFailed
        } else {
            PluginState::Ignored
        }
    }

    /// The import error, or else the first instantiation error.
    pub fn error(&self) -> Option<&StrataError> {
        self.import_error
            .as_ref()
            .or_else(|| self.failures.first().map(|f| &f.error))
    }
}

/// Counts of terminal states across a load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub ignored: usize,
    pub import_failed: usize,
    pub instantiation_failed: usize,
}

/// Result of a load pass: the registry plus one [`PluginInfo`] per candidate.
#[derive(Debug)]
pub struct LoadOutcome {
    pub registry: PipelineRegistry,
    pub plugins: Vec<PluginInfo>,
}

impl LoadOutcome {
    pub fn summary(&self) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for plugin in &self.plugins {
            match plugin.state() {
                PluginState::Loaded { .. } => summary.loaded += 1,
                PluginState::Ignored => summary.ignored += 1,
                PluginState::ImportFailed => summary.import_failed += 1,
                PluginState::InstantiationFailed => summary.instantiation_failed += 1,
            }
        }
        summary
    }

    /// Audit entries that carry an error.
    pub fn failed(&self) -> impl Iterator<Item = &PluginInfo> {
        self.plugins.iter().filter(|p| p.error().is_some())
    }
}

/// Progress notification invoked once per candidate before import.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&PluginCandidate);

/// Outcome of the first instantiation of an export within one candidate.
struct Constructed {
    instance: Result<Arc<dyn PluginAdapter>, String>,
    args_category: String,
    args: ArgSpec,
}

/// Loads candidates against a capability registry and a policy.
#[derive(Debug)]
pub struct PluginLoader {
    capabilities: CapabilityRegistry,
    policy: PolicyEngine,
    resolver: ModuleResolver,
}

impl PluginLoader {
    pub fn new(capabilities: CapabilityRegistry, policy: PolicyEngine, resolver: ModuleResolver) -> Self {
        Self {
            capabilities,
            policy,
            resolver,
        }
    }

    /// Add plugin roots to the loader's module search paths.
    pub fn with_search_paths<I>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.resolver.extend_search_paths(roots);
        self
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Load every candidate and build the pipeline registry.
    ///
    /// Never fails: import and instantiation errors are recorded on the
    /// returned [`PluginInfo`] entries, exactly one per candidate.
    pub fn load(
        &mut self,
        candidates: &[PluginCandidate],
        mut on_progress: Option<ProgressCallback<'_>>,
    ) -> LoadOutcome {
        let mut registry = PipelineRegistry::with_stages(self.capabilities.iter());
        let mut plugins = Vec::with_capacity(candidates.len());
        // Names already bound per category; dropped at the end of the pass.
        let mut bound: HashMap<String, HashSet<String>> = HashMap::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let module_id = self.resolver.assign_module_id(candidate.name());

            if let Some(callback) = on_progress.as_deref_mut()
                && let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(candidate)))
            {
                warn!(
                    plugin = %candidate.name(),
                    error = %panic_message(payload.as_ref()),
                    "progress callback panicked"
                );
            }

            let info = self.load_candidate(index, candidate, module_id, &mut registry, &mut bound);
            plugins.push(info);
        }

        for (category, _) in self.capabilities.iter() {
            registry.sort_stage(category, &self.policy.ordering(category));
        }

        let outcome = LoadOutcome { registry, plugins };
        let summary = outcome.summary();
        info!(
            candidates = candidates.len(),
            loaded = summary.loaded,
            ignored = summary.ignored,
            import_failed = summary.import_failed,
            instantiation_failed = summary.instantiation_failed,
            bindings = outcome.registry.len(),
            "plugin load complete"
        );
        outcome
    }

    fn load_candidate(
        &self,
        index: usize,
        candidate: &PluginCandidate,
        module_id: String,
        registry: &mut PipelineRegistry,
        bound: &mut HashMap<String, HashSet<String>>,
    ) -> PluginInfo {
        let mut info = PluginInfo::pending(candidate.clone(), module_id);
        let name = candidate.name();

        let exports = match self.resolver.import(&info.module_id, candidate) {
            Ok(exports) => exports,
            Err(e) => {
                error!(
                    plugin = %name,
                    path = %candidate.location.display(),
                    error = %e,
                    "unable to import plugin"
                );
                info.import_error = Some(e);
                return info;
            }
        };

        // Keyed by export position: one instance per export, shared across categories.
        let mut constructed: HashMap<usize, Constructed> = HashMap::new();

        for (category, contract) in self.capabilities.iter() {
            let Some((export_index, export)) = first_implementer(&exports, contract) else {
                continue;
            };

            if bound.get(category).is_some_and(|names| names.contains(name)) {
                warn!(
                    plugin = %name,
                    category,
                    candidate = %candidate.id,
                    "plugin name already bound by an earlier candidate, skipping"
                );
                continue;
            }

            if !self.policy.should_include(category, name) {
                debug!(plugin = %name, category, "plugin excluded by policy");
                continue;
            }

            let args = self.policy.constructor_args(category, name);
            let built = constructed.entry(export_index).or_insert_with(|| Constructed {
                instance: instantiate(export, args),
                args_category: category.to_string(),
                args: args.clone(),
            });
            if built.args_category != category && built.args != *args {
                warn!(
                    plugin = %name,
                    category,
                    configured_by = %built.args_category,
                    "plugin already instantiated with another category's arguments"
                );
            }

            let failure = |message: String| {
                error!(plugin = %name, category, error = %message, "unable to create plugin");
                BindingFailure {
                    category: category.to_string(),
                    symbol: export.symbol.clone(),
                    error: StrataError::Instantiation {
                        category: category.to_string(),
                        plugin: name.to_string(),
                        message,
                    },
                }
            };

            let instance = match &built.instance {
                Ok(instance) => Arc::clone(instance),
                Err(message) => {
                    info.failures.push(failure(message.clone()));
                    continue;
                }
            };

            if !instance.provides(contract) {
                warn!(
                    plugin = %name,
                    category,
                    symbol = %export.symbol,
                    %contract,
                    "plugin declares a contract its instance does not provide"
                );
                info.failures.push(failure(format!(
                    "`{}` declares {contract} but its instance does not provide it",
                    export.symbol
                )));
                continue;
            }

            bound
                .entry(category.to_string())
                .or_default()
                .insert(name.to_string());
            registry.push(RegisteredPlugin {
                name: name.to_string(),
                version: candidate.version().clone(),
                symbol: export.symbol.clone(),
                category: category.to_string(),
                discovery_index: index,
                instance: Arc::clone(&instance),
            });
            info.bindings.push(Binding {
                category: category.to_string(),
                symbol: export.symbol.clone(),
                instance,
            });
            info!(plugin = %name, category, symbol = %export.symbol, "plugin bound");
        }

        if info.bindings.is_empty() && info.failures.is_empty() {
            debug!(plugin = %name, "plugin bound to no category");
        }
        info
    }
}

/// First export, in declaration order, implementing `contract`.
fn first_implementer(
    exports: &[PluginExport],
    contract: Contract,
) -> Option<(usize, &PluginExport)> {
    exports.iter().enumerate().find(|(_, e)| e.implements(contract))
}
