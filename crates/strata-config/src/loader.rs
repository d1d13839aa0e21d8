// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! A run reads one file: either an explicit path or the first existing of
//! `./strata.toml`, `~/.config/strata/strata.toml` and `/etc/strata/strata.toml`.
//! Compiled defaults sit below it and `STRATA_` environment overrides above it.
//! Relative plugin roots resolve against the directory of that file.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::debug;

use crate::model::StrataConfig;

/// Candidate config files in precedence order, lowest first.
pub fn config_file_hierarchy() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/strata/strata.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("strata/strata.toml"));
    }
    files.push(PathBuf::from("strata.toml"));
    files
}

/// The highest-precedence config file that exists, if any.
pub fn locate_config_file() -> Option<PathBuf> {
    config_file_hierarchy().into_iter().rev().find(|path| path.is_file())
}

/// Directory that relative paths in the config file at `path` resolve against.
pub fn config_dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<StrataConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrataConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrataConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(StrataConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment overrides. Only the inclusion mode is overridable.
///
/// `STRATA_PLUGINS_MODE=whitelist` maps to `plugins.mode`. Uses an explicit
/// filter + map instead of `Env::split("_")` because category and key names
/// contain underscores.
fn env_provider() -> Env {
    Env::prefixed("STRATA_")
        .filter(|key| key.as_str().eq_ignore_ascii_case("plugins_mode"))
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("plugins_", "plugins.", 1)
                .into()
        })
}
