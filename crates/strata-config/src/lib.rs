// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Strata plugin pipeline.
//!
//! Parses the TOML policy document (plugin roots, inclusion mode, per-category
//! lists, constructor arguments and explicit ordering) with figment, validates
//! it against the known category set, and renders failures as miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use strata_config::load_and_validate_path;
//!
//! let config = load_and_validate_path("strata.toml".as_ref()).expect("config errors");
//! println!("mode: {:?}", config.plugins.mode);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{
    config_dir_of, load_config_from_path, load_config_from_str, locate_config_file,
};
pub use model::{InclusionMode, PluginsConfig, StrataConfig};
pub use validation::{default_categories, validate_config, validate_config_for};

/// Locate the config file, load and validate it.
///
/// Returns the configuration together with the directory relative plugin
/// roots resolve against.
pub fn load_and_validate() -> Result<(StrataConfig, PathBuf), Vec<ConfigError>> {
    let Some(path) = loader::locate_config_file() else {
        return Err(vec![ConfigError::Other(
            "no strata.toml found in ., the user config directory or /etc/strata".to_string(),
        )]);
    };
    let config = load_and_validate_path(&path)?;
    Ok((config, loader::config_dir_of(&path)))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<StrataConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from an explicit file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<StrataConfig, Vec<ConfigError>> {
    if !path.is_file() {
        return Err(vec![ConfigError::Other(format!(
            "config file {} does not exist",
            path.display()
        ))]);
    }
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = read_sources(&[path.to_path_buf()]);
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read config file contents for error span resolution; missing files are skipped.
fn read_sources(paths: &[PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            Some((shown.display().to_string(), content))
        })
        .collect()
}
