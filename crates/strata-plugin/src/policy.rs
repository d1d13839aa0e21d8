// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy engine: inclusion, constructor arguments and ordering per category.
//!
//! Built once from a validated [`StrataConfig`]; read-only afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};

use strata_config::{InclusionMode, StrataConfig, validate_config_for};
use strata_core::{ArgSpec, StrataError};

use crate::capability::CapabilityRegistry;

static NO_ARGS: ArgSpec = ArgSpec::None;

/// Configuration-derived decisions consulted by the loader.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    mode: InclusionMode,
    lists: BTreeMap<String, HashSet<String>>,
    args: BTreeMap<String, BTreeMap<String, ArgSpec>>,
    order: BTreeMap<String, Vec<String>>,
}

impl PolicyEngine {
    /// Build the policy for the given capability registry.
    ///
    /// Fails with [`StrataError::Config`] if the configuration names an
    /// unknown category or is otherwise malformed.
    pub fn new(config: &StrataConfig, capabilities: &CapabilityRegistry) -> Result<Self, StrataError> {
        validate_config_for(config, &capabilities.category_names()).map_err(|errors| {
            StrataError::Config(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        Ok(Self {
            mode: config.plugins.mode,
            lists: config
                .plugins
                .lists
                .iter()
                .map(|(category, names)| (category.clone(), names.iter().cloned().collect()))
                .collect(),
            args: config.plugin_config.clone(),
            order: config.plugin_order.clone(),
        })
    }

    /// Blacklist mode with no lists: every qualifying plugin is included.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InclusionMode {
        self.mode
    }

    /// Should `plugin` be bound to `category`?
    ///
    /// Whitelist: only if listed (no list excludes the whole category).
    /// Blacklist: only if not listed (no list includes the whole category).
    pub fn should_include(&self, category: &str, plugin: &str) -> bool {
        let listed = self
            .lists
            .get(category)
            .is_some_and(|names| names.contains(plugin));
        match self.mode {
            InclusionMode::Whitelist => listed,
            InclusionMode::Blacklist => !listed,
        }
    }

    /// Constructor arguments for `plugin` in `category`; `ArgSpec::None` if unset.
    pub fn constructor_args(&self, category: &str, plugin: &str) -> &ArgSpec {
        self.args
            .get(category)
            .and_then(|plugins| plugins.get(plugin))
            .unwrap_or(&NO_ARGS)
    }

    /// The rank function for a category's explicit ordering.
    pub fn ordering(&self, category: &str) -> Ranking<'_> {
        let names = self.order.get(category).map(Vec::as_slice).unwrap_or(&[]);
        Ranking {
            positions: names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), i))
                .collect(),
            unranked: names.len(),
        }
    }
}

/// Maps plugin names to their priority within one category.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    positions: HashMap<&'a str, usize>,
    unranked: usize,
}

impl Ranking<'_> {
    /// Index in the ordering list, or the list length for unnamed plugins.
    pub fn rank(&self, plugin: &str) -> usize {
        self.positions.get(plugin).copied().unwrap_or(self.unranked)
    }
}
