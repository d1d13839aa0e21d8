// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the policy sections.
//!
//! Guessing what a misspelled category or an ambiguous order list meant would
//! silently change which plugins run, so every problem here is fatal.

use std::collections::HashSet;

use strata_core::Contract;
use strum::IntoEnumIterator;

use crate::diagnostic::{suggest_key, ConfigError};
use crate::model::StrataConfig;

/// Category names of the built-in capability registry.
pub fn default_categories() -> Vec<String> {
    Contract::iter().map(|c| c.to_string()).collect()
}

/// Validate against the built-in category set.
pub fn validate_config(config: &StrataConfig) -> Result<(), Vec<ConfigError>> {
    validate_config_for(config, &default_categories())
}

/// Validate a configuration against an explicit set of known category names.
///
/// Collects every error instead of failing fast.
pub fn validate_config_for(
    config: &StrataConfig,
    categories: &[String],
) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (i, root) in config.plugin_roots.iter().enumerate() {
        if root.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugin_roots[{i}] must not be empty"),
            });
        }
    }

    let valid: Vec<&str> = categories.iter().map(String::as_str).collect();
    for (section, category) in config.referenced_categories() {
        if !valid.contains(&category) {
            errors.push(ConfigError::UnknownCategory {
                section: section.to_string(),
                category: category.to_string(),
                suggestion: suggest_key(category, &valid),
                valid: valid.join(", "),
            });
        }
    }

    for (category, order) in &config.plugin_order {
        let mut seen = HashSet::new();
        for plugin in order {
            if !seen.insert(plugin) {
                errors.push(ConfigError::DuplicateOrder {
                    category: category.clone(),
                    plugin: plugin.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
