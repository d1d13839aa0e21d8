// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for plugin discovery, inclusion policy and ordering.
//!
//! The top-level struct uses `#[serde(deny_unknown_fields)]` so misspelled
//! section names are rejected at startup rather than silently ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_core::ArgSpec;

/// Top-level Strata configuration.
///
/// Every section is optional. An empty document yields blacklist mode with
/// no lists, which includes every qualifying plugin in every category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrataConfig {
    /// Plugin root directories, absolute or relative to the config file's directory.
    #[serde(default)]
    pub plugin_roots: Vec<String>,

    /// Inclusion mode and per-category name lists.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Constructor arguments keyed by category, then plugin name.
    #[serde(default)]
    pub plugin_config: BTreeMap<String, BTreeMap<String, ArgSpec>>,

    /// Explicit priority order of plugin names, keyed by category.
    #[serde(default)]
    pub plugin_order: BTreeMap<String, Vec<String>>,
}

impl StrataConfig {
    /// Resolve `plugin_roots` against the directory holding the config file.
    ///
    /// Absolute entries are kept as-is; relative entries are joined onto
    /// `config_dir`, never onto the process working directory.
    pub fn resolve_plugin_roots(&self, config_dir: &Path) -> Vec<PathBuf> {
        self.plugin_roots
            .iter()
            .map(|root| {
                let path = Path::new(root);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    config_dir.join(path)
                }
            })
            .collect()
    }

    /// Every category name mentioned anywhere in the policy sections.
    pub fn referenced_categories(&self) -> Vec<(&'static str, &str)> {
        let mut referenced = Vec::new();
        for name in self.plugins.lists.keys() {
            referenced.push(("plugins", name.as_str()));
        }
        for name in self.plugin_config.keys() {
            referenced.push(("plugin_config", name.as_str()));
        }
        for name in self.plugin_order.keys() {
            referenced.push(("plugin_order", name.as_str()));
        }
        referenced
    }
}

/// How the per-category name lists are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InclusionMode {
    /// Only listed plugins are included; a category without a list is fully excluded.
    Whitelist,
    /// Listed plugins are excluded; a category without a list is fully included.
    #[default]
    Blacklist,
}

/// The `[plugins]` section: a mode plus one name list per category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub mode: InclusionMode,

    /// Category name -> plugin names, interpreted under `mode`.
    #[serde(flatten)]
    pub lists: BTreeMap<String, Vec<String>>,
}
