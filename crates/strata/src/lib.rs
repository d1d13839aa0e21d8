// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strata: a pluggable data pipeline.
//!
//! This crate ties the workspace together. Given a configuration file it
//! resolves the plugin roots against the file's directory, validates the
//! policy against the capability registry, discovers candidates and loads
//! them into an ordered [`PipelineRegistry`].
//!
//! ```no_run
//! use std::path::Path;
//!
//! let outcome = strata::collect_plugins(Path::new("strata.toml"), strata::builtin_catalog(), None)?;
//! for plugin in outcome.registry.get("Storage") {
//!     println!("{} {}", plugin.name, plugin.version);
//! }
//! # Ok::<(), strata::StrataError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, error};

pub use strata_config::{InclusionMode, StrataConfig};
pub use strata_core::{
    ArgSpec, Contract, DataItem, DataModel, DataModelAdapter, ExtractionAdapter, PluginAdapter,
    PostProcessingAdapter, Record, StorageAdapter, StrataError, ValidationAdapter,
};
pub use strata_plugin::{
    CapabilityRegistry, LoadOutcome, LoadSummary, ModuleCatalog, PipelineRegistry, PluginCandidate,
    PluginInfo, PluginManager, PluginState, ProgressCallback,
};

pub use strata_storage::SqliteFlatStorage;

/// Catalog of the modules compiled into this crate.
pub fn builtin_catalog() -> ModuleCatalog {
    let mut catalog = ModuleCatalog::new();
    strata_storage::register(&mut catalog);
    catalog
}

/// Load a configuration file without validating categories.
///
/// Returns the parsed configuration and the directory relative plugin roots
/// resolve against.
pub fn load_config_file(path: &Path) -> Result<(StrataConfig, PathBuf), StrataError> {
    if !path.is_file() {
        return Err(StrataError::Config(format!(
            "config file {} does not exist",
            path.display()
        )));
    }

    let config = strata_config::load_config_from_path(path).map_err(|err| {
        let sources = std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default();
        let errors = strata_config::diagnostic::figment_to_config_errors(err, &sources);
        StrataError::Config(strata_config::render_errors(&errors))
    })?;

    let config_dir = strata_config::config_dir_of(path);
    debug!(path = %path.display(), config_dir = %config_dir.display(), "configuration loaded");
    Ok((config, config_dir))
}

/// Build a plugin manager for the configuration at `path`.
///
/// Policy sections are validated against `capabilities`; every problem is
/// reported at once, rendered with suggestions.
pub fn manager_from_path(
    path: &Path,
    capabilities: CapabilityRegistry,
    catalog: ModuleCatalog,
) -> Result<PluginManager, StrataError> {
    let (config, config_dir) = load_config_file(path)?;

    if let Err(errors) =
        strata_config::validate_config_for(&config, &capabilities.category_names())
    {
        for e in &errors {
            error!(error = %e, "invalid plugin configuration");
        }
        return Err(StrataError::Config(strata_config::render_errors(&errors)));
    }

    PluginManager::new(&config, &config_dir, capabilities, catalog)
}

/// Locate and load every plugin described by the configuration at `path`,
/// using the built-in capability registry.
///
/// Only configuration and discovery failures are returned as errors; import
/// and instantiation failures are reported on the outcome's [`PluginInfo`]s.
pub fn collect_plugins(
    path: &Path,
    catalog: ModuleCatalog,
    on_progress: Option<ProgressCallback<'_>>,
) -> Result<LoadOutcome, StrataError> {
    let mut manager = manager_from_path(path, CapabilityRegistry::builtin(), catalog)?;
    manager.collect_plugins(on_progress)
}
