// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary plugin trees for discovery and end-to-end tests.
//!
//! Layout:
//!
//! ```text
//! <tmp>/strata.toml                      (optional, via write_config)
//! <tmp>/plugins/<dir>/<name>.strata-plugin.toml
//! <tmp>/plugins/<dir>/<module>.rs
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Directory name of the plugin root inside the tree.
pub const PLUGIN_ROOT_DIR: &str = "plugins";

/// A temporary directory holding one plugin root and an optional config file.
pub struct PluginTree {
    dir: TempDir,
    root: PathBuf,
}

impl PluginTree {
    pub fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        let root = dir.path().join(PLUGIN_ROOT_DIR);
        std::fs::create_dir_all(&root)?;
        Ok(Self { dir, root })
    }

    /// The tree's base directory, where the config file lives.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The plugin root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add plugin `name` under `plugins/<name>/` with code unit `<module>.rs`.
    pub fn add(&self, name: &str, module: &str) -> io::Result<PathBuf> {
        self.add_in(name, name, module)
    }

    /// Add plugin `name` under `plugins/<dir>/`.
    ///
    /// Discovery visits directories in sorted order, so `dir` controls the
    /// candidate's position.
    pub fn add_in(&self, dir: &str, name: &str, module: &str) -> io::Result<PathBuf> {
        let plugin_dir = self.root.join(dir);
        std::fs::create_dir_all(&plugin_dir)?;
        let descriptor = plugin_dir.join(format!("{name}.strata-plugin.toml"));
        std::fs::write(
            &descriptor,
            format!(
                "[plugin]\nname = \"{name}\"\nversion = \"1.0.0\"\ndescription = \"{name} test plugin\"\nmodule = \"{module}\"\n"
            ),
        )?;
        std::fs::write(plugin_dir.join(format!("{module}.rs")), "// compiled in\n")?;
        Ok(descriptor)
    }

    /// Write an arbitrary file relative to the plugin root.
    pub fn add_raw(&self, relative: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write `strata.toml` with `plugin_roots = ["plugins"]` followed by `body`.
    pub fn write_config(&self, body: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join("strata.toml");
        std::fs::write(
            &path,
            format!("plugin_roots = [\"{PLUGIN_ROOT_DIR}\"]\n{body}"),
        )?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_writes_descriptor_and_code_unit() {
        let tree = PluginTree::new().unwrap();
        let descriptor = tree.add("csv", "csv_extract").unwrap();
        assert!(descriptor.exists());
        assert!(tree.root().join("csv/csv_extract.rs").exists());

        let candidates = strata_plugin::discover(&[tree.root().to_path_buf()]).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name(), "csv");
    }

    #[test]
    fn write_config_points_at_plugin_root() {
        let tree = PluginTree::new().unwrap();
        let path = tree.write_config("[plugins]\nmode = \"whitelist\"\n").unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("plugin_roots = [\"plugins\"]"));
    }
}
