// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, capability binding, inclusion policy and ordered loading.
//!
//! The locator finds candidate descriptors under the plugin roots without
//! running any plugin code. The loader imports each candidate's compiled-in
//! module through an injected [`ModuleResolver`], binds exports to the
//! categories of a [`CapabilityRegistry`], applies the [`PolicyEngine`] and
//! produces an ordered [`PipelineRegistry`] plus a per-candidate audit.

pub mod capability;
pub mod loader;
pub mod locator;
pub mod manager;
pub mod manifest;
pub mod module;
pub mod policy;
pub mod registry;

pub use capability::CapabilityRegistry;
pub use loader::{
    Binding, BindingFailure, LoadOutcome, LoadSummary, PluginInfo, PluginLoader, PluginState,
    ProgressCallback,
};
pub use locator::{CandidateLocator, PluginCandidate, discover};
pub use manager::PluginManager;
pub use manifest::{DESCRIPTOR_EXTENSION, PluginDescriptor, parse_plugin_descriptor};
pub use module::{
    ModuleCatalog, ModuleResolver, PluginExport, PluginFactory, PluginModule, normalize_module_name,
};
pub use policy::{PolicyEngine, Ranking};
pub use registry::{PipelineRegistry, RegisteredPlugin};
