// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptor parsing from `*.strata-plugin.toml` sidecar files.
//!
//! A descriptor carries the plugin's metadata and points at its code unit.
//! Parsing never touches the code unit itself.

use serde::Deserialize;
use strata_core::StrataError;

/// File-name suffix that marks a plugin descriptor.
pub const DESCRIPTOR_EXTENSION: &str = "strata-plugin.toml";

/// Parsed plugin descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    /// Plugin name used by policy lists, ordering and constructor arguments.
    pub name: String,
    pub version: semver::Version,
    pub description: String,
    /// Code unit path relative to the descriptor (file or directory).
    pub module: String,
    pub author: Option<String>,
}

/// Intermediate TOML deserialization struct.
#[derive(Debug, Deserialize)]
struct DescriptorFile {
    plugin: DescriptorSection,
}

/// The `[plugin]` section of a descriptor file.
#[derive(Debug, Deserialize)]
struct DescriptorSection {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    module: Option<String>,
    author: Option<String>,
}

/// Parse a plugin descriptor from TOML content.
///
/// `name` and `version` must be non-empty and `version` must be valid
/// semver. `module` defaults to the plugin name.
pub fn parse_plugin_descriptor(toml_content: &str) -> Result<PluginDescriptor, StrataError> {
    let file: DescriptorFile = toml::from_str(toml_content)
        .map_err(|e| StrataError::Config(format!("invalid plugin descriptor: {e}")))?;

    let section = file.plugin;

    if section.name.trim().is_empty() {
        return Err(StrataError::Config(
            "plugin descriptor: name must not be empty".to_string(),
        ));
    }

    if section.version.trim().is_empty() {
        return Err(StrataError::Config(
            "plugin descriptor: version must not be empty".to_string(),
        ));
    }

    let version = semver::Version::parse(section.version.trim()).map_err(|e| {
        StrataError::Config(format!(
            "plugin descriptor: invalid version '{}': {e}",
            section.version
        ))
    })?;

    let module = match section.module {
        Some(module) if module.trim().is_empty() => {
            return Err(StrataError::Config(
                "plugin descriptor: module must not be empty".to_string(),
            ));
        }
        Some(module) => module,
        None => section.name.clone(),
    };

    Ok(PluginDescriptor {
        name: section.name,
        version,
        description: section.description,
        module,
        author: section.author,
    })
}
