// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manager: wires configuration, discovery and loading together.

use std::path::{Path, PathBuf};

use strata_config::StrataConfig;
use strata_core::StrataError;

use crate::capability::CapabilityRegistry;
use crate::loader::{LoadOutcome, PluginLoader, ProgressCallback};
use crate::locator::{CandidateLocator, PluginCandidate};
use crate::module::{ModuleCatalog, ModuleResolver};
use crate::policy::PolicyEngine;

/// Owns the locator and loader for one configuration.
#[derive(Debug)]
pub struct PluginManager {
    roots: Vec<PathBuf>,
    locator: CandidateLocator,
    loader: PluginLoader,
}

impl PluginManager {
    /// Build a manager from a configuration.
    ///
    /// Relative plugin roots are resolved against `config_dir`, the
    /// directory holding the configuration file. Fails with
    /// [`StrataError::Config`] if the policy configuration is invalid for
    /// `capabilities`.
    pub fn new(
        config: &StrataConfig,
        config_dir: &Path,
        capabilities: CapabilityRegistry,
        catalog: ModuleCatalog,
    ) -> Result<Self, StrataError> {
        let roots = config.resolve_plugin_roots(config_dir);
        let policy = PolicyEngine::new(config, &capabilities)?;
        let loader = PluginLoader::new(capabilities, policy, ModuleResolver::new(catalog))
            .with_search_paths(roots.iter().cloned());

        Ok(Self {
            roots,
            locator: CandidateLocator::new(),
            loader,
        })
    }

    /// Replace the candidate locator, e.g. to use another descriptor suffix.
    pub fn with_locator(mut self, locator: CandidateLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn plugin_roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    /// Discover candidates under the configured roots.
    pub fn locate_plugins(&self) -> Result<Vec<PluginCandidate>, StrataError> {
        self.locator.discover(&self.roots)
    }

    pub fn load_plugins(
        &mut self,
        candidates: &[PluginCandidate],
        on_progress: Option<ProgressCallback<'_>>,
    ) -> LoadOutcome {
        self.loader.load(candidates, on_progress)
    }

    /// Locate and load in one call. Only discovery failures are returned as errors.
    pub fn collect_plugins(
        &mut self,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> Result<LoadOutcome, StrataError> {
        let candidates = self.locate_plugins()?;
        Ok(self.load_plugins(&candidates, on_progress))
    }
}
