// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate discovery: read-only enumeration of plugin roots.
//!
//! The locator walks each root recursively in sorted file-name order and
//! turns every descriptor it finds into a [`PluginCandidate`]. It never
//! resolves or runs a candidate's code unit.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use strata_core::StrataError;
use tracing::{debug, info, warn};

use crate::manifest::{DESCRIPTOR_EXTENSION, PluginDescriptor, parse_plugin_descriptor};

/// A discovered, not yet loaded plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginCandidate {
    /// Identifier unique within one discovery pass (the descriptor path).
    pub id: String,
    pub descriptor: PluginDescriptor,
    pub descriptor_path: PathBuf,
    /// The code unit the descriptor points at, resolved against its directory.
    pub location: PathBuf,
}

impl PluginCandidate {
    /// Build a candidate from a parsed descriptor and the path it was read from.
    pub fn new(descriptor: PluginDescriptor, descriptor_path: PathBuf) -> Self {
        let location = descriptor_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&descriptor.module);
        Self {
            id: descriptor_path.display().to_string(),
            descriptor,
            descriptor_path,
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.descriptor.version
    }
}

/// Walks plugin roots looking for descriptor files.
#[derive(Debug, Clone)]
pub struct CandidateLocator {
    suffix: String,
}

impl Default for CandidateLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateLocator {
    pub fn new() -> Self {
        Self::with_extension(DESCRIPTOR_EXTENSION)
    }

    /// Use a different descriptor file suffix (without the leading dot).
    pub fn with_extension(extension: &str) -> Self {
        Self {
            suffix: format!(".{extension}"),
        }
    }

    /// Discover every candidate under `roots`, in root order then sorted path order.
    ///
    /// Missing roots are skipped. A descriptor reachable from several roots
    /// (a root listed twice, or one root nested in another) is reported once,
    /// for the first root that reaches it. Any other I/O failure aborts
    /// discovery with [`StrataError::Discovery`].
    /// Descriptors that fail to parse are logged and skipped. Duplicate
    /// plugin names are kept; the loader decides precedence.
    pub fn discover(&self, roots: &[PathBuf]) -> Result<Vec<PluginCandidate>, StrataError> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        for root in roots {
            if !root.exists() {
                warn!(root = %root.display(), "plugin root does not exist, skipping");
                continue;
            }
            if !root.is_dir() {
                warn!(root = %root.display(), "plugin root is not a directory, skipping");
                continue;
            }
            self.walk(root, &mut seen, &mut candidates)?;
        }

        info!(
            roots = roots.len(),
            candidates = candidates.len(),
            "plugin discovery complete"
        );
        Ok(candidates)
    }

    fn walk(
        &self,
        dir: &Path,
        seen: &mut HashSet<PathBuf>,
        out: &mut Vec<PluginCandidate>,
    ) -> Result<(), StrataError> {
        let discovery_err = |source| StrataError::Discovery {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = std::fs::read_dir(dir)
            .map_err(discovery_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(discovery_err)?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| StrataError::Discovery {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                self.walk(&path, seen, out)?;
                continue;
            }

            let is_descriptor = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.suffix));
            if !file_type.is_file() || !is_descriptor {
                continue;
            }

            let canonical = std::fs::canonicalize(&path).map_err(|source| {
                StrataError::Discovery {
                    path: path.clone(),
                    source,
                }
            })?;
            if !seen.insert(canonical) {
                debug!(path = %path.display(), "plugin descriptor already discovered");
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|source| {
                StrataError::Discovery {
                    path: path.clone(),
                    source,
                }
            })?;

            match parse_plugin_descriptor(&content) {
                Ok(descriptor) => {
                    debug!(
                        plugin = %descriptor.name,
                        version = %descriptor.version,
                        path = %path.display(),
                        "plugin candidate found"
                    );
                    out.push(PluginCandidate::new(descriptor, path));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable plugin descriptor");
                }
            }
        }

        Ok(())
    }
}

/// Discover candidates under `roots` with the default descriptor suffix.
pub fn discover(roots: &[PathBuf]) -> Result<Vec<PluginCandidate>, StrataError> {
    CandidateLocator::new().discover(roots)
}
