// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled-in plugin modules and the resolution context that imports them.
//!
//! A candidate's code unit is a [`PluginModule`] registered in a
//! [`ModuleCatalog`] under the code unit's file stem. Importing a module runs
//! its `import` hook, which returns its exports in declaration order. Each
//! [`PluginExport`] states which contracts it implements and carries the
//! factory that constructs it. Panics in plugin code are caught here so they
//! surface as ordinary import or instantiation errors.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use strata_core::{ArgSpec, Contract, PluginAdapter, StrataError};
use tracing::debug;

use crate::locator::PluginCandidate;

/// Factory for constructing a plugin instance from resolved arguments.
pub trait PluginFactory: Send + Sync {
    fn create(&self, args: &ArgSpec) -> Result<Arc<dyn PluginAdapter>, StrataError>;
}

impl<F> PluginFactory for F
where
    F: Fn(&ArgSpec) -> Result<Arc<dyn PluginAdapter>, StrataError> + Send + Sync,
{
    fn create(&self, args: &ArgSpec) -> Result<Arc<dyn PluginAdapter>, StrataError> {
        self(args)
    }
}

/// A top-level symbol exposed by an imported module.
pub struct PluginExport {
    pub symbol: String,
    /// Contracts this symbol implements. Empty for helper symbols.
    pub contracts: Vec<Contract>,
    pub factory: Box<dyn PluginFactory>,
}

impl PluginExport {
    pub fn new(
        symbol: impl Into<String>,
        contracts: &[Contract],
        factory: impl PluginFactory + 'static,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            contracts: contracts.to_vec(),
            factory: Box::new(factory),
        }
    }

    pub fn implements(&self, contract: Contract) -> bool {
        self.contracts.contains(&contract)
    }
}

impl std::fmt::Debug for PluginExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginExport")
            .field("symbol", &self.symbol)
            .field("contracts", &self.contracts)
            .finish_non_exhaustive()
    }
}

/// A compiled-in code unit.
pub trait PluginModule: Send + Sync {
    /// Runs import-time initialization and returns the exports in declaration order.
    fn import(&self) -> Result<Vec<PluginExport>, StrataError>;
}

impl<F> PluginModule for F
where
    F: Fn() -> Result<Vec<PluginExport>, StrataError> + Send + Sync,
{
    fn import(&self) -> Result<Vec<PluginExport>, StrataError> {
        self()
    }
}

/// Compiled-in modules keyed by code unit name.
#[derive(Default, Clone)]
pub struct ModuleCatalog {
    modules: HashMap<String, Arc<dyn PluginModule>>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A later registration under the same key replaces the earlier one.
    pub fn register(&mut self, key: impl Into<String>, module: Arc<dyn PluginModule>) {
        self.modules.insert(key.into(), module);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, key: impl Into<String>, module: Arc<dyn PluginModule>) -> Self {
        self.register(key, module);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn PluginModule>> {
        self.modules.get(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("modules", &self.keys())
            .finish()
    }
}

/// Module resolution context owned by a loader.
///
/// Holds the search paths (plugin roots) and the catalog, and hands out
/// synthetic module identifiers that stay unique for the resolver's
/// lifetime, so loading the same candidate in a later run never collides
/// with an earlier one.
#[derive(Debug, Default)]
pub struct ModuleResolver {
    search_paths: Vec<PathBuf>,
    catalog: ModuleCatalog,
    assigned: HashSet<String>,
}

impl ModuleResolver {
    pub fn new(catalog: ModuleCatalog) -> Self {
        Self {
            search_paths: Vec::new(),
            catalog,
            assigned: HashSet::new(),
        }
    }

    /// Append search paths, skipping ones already present.
    pub fn extend_search_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            if !self.search_paths.contains(&path) {
                self.search_paths.push(path);
            }
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Reserve the next free identifier for a candidate name.
    ///
    /// Produces `strata_loaded_plugin_<normalized>_<n>` with the smallest
    /// unused `n`.
    pub fn assign_module_id(&mut self, plugin_name: &str) -> String {
        let base = format!("strata_loaded_plugin_{}", normalize_module_name(plugin_name));
        let mut n = 0usize;
        loop {
            let id = format!("{base}_{n}");
            if self.assigned.insert(id.clone()) {
                return id;
            }
            n += 1;
        }
    }

    /// Import a candidate's code unit.
    ///
    /// Fails with [`StrataError::Import`] if the code unit is outside the
    /// search paths, missing on disk, not registered in the catalog, or if its
    /// import hook returns an error or panics.
    pub fn import(
        &self,
        module_id: &str,
        candidate: &PluginCandidate,
    ) -> Result<Vec<PluginExport>, StrataError> {
        let import_err = |message: String| StrataError::Import {
            module: module_id.to_string(),
            message,
        };

        let location = &candidate.location;
        let resolved = resolve_code_unit(location).ok_or_else(|| {
            import_err(format!("code unit {} not found", location.display()))
        })?;
        if !self.on_search_path(&resolved) {
            return Err(import_err(format!(
                "{} is not under any plugin search path",
                location.display()
            )));
        }

        let key = code_unit_key(&resolved)
            .ok_or_else(|| import_err(format!("cannot derive module name from {}", resolved.display())))?;

        let module = self
            .catalog
            .get(&key)
            .ok_or_else(|| import_err(format!("no compiled-in module named `{key}`")))?;

        debug!(module = %key, module_id, path = %resolved.display(), "importing plugin module");

        match catch_unwind(AssertUnwindSafe(|| module.import())) {
            Ok(Ok(exports)) => Ok(exports),
            Ok(Err(StrataError::Import { message, .. })) => Err(import_err(message)),
            Ok(Err(other)) => Err(import_err(other.to_string())),
            Err(payload) => Err(import_err(format!(
                "panicked during import: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }

    /// Compares canonical paths, so `..` components and symlinks cannot
    /// lead out of a root.
    fn on_search_path(&self, code_unit: &Path) -> bool {
        let Ok(code_unit) = std::fs::canonicalize(code_unit) else {
            return false;
        };
        self.search_paths.iter().any(|root| {
            std::fs::canonicalize(root).is_ok_and(|root| code_unit.starts_with(root))
        })
    }
}

/// Invoke a factory, returning the failure message on error or panic.
pub(crate) fn instantiate(export: &PluginExport, args: &ArgSpec) -> Result<Arc<dyn PluginAdapter>, String> {
    match catch_unwind(AssertUnwindSafe(|| export.factory.create(args))) {
        Ok(Ok(instance)) => Ok(instance),
        Ok(Err(StrataError::Instantiation { message, .. })) => Err(message),
        Ok(Err(other)) => Err(other.to_string()),
        Err(payload) => Err(format!(
            "panicked in constructor: {}",
            panic_message(payload.as_ref())
        )),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Accept the code unit as given, or with a `.rs` extension appended.
fn resolve_code_unit(location: &Path) -> Option<PathBuf> {
    if location.exists() {
        return Some(location.to_path_buf());
    }
    let with_ext = location.with_extension("rs");
    with_ext.exists().then_some(with_ext)
}

/// Catalog key for a code unit: a file's stem, or a directory's name.
///
/// A path pointing at a directory's `mod.rs` resolves to the directory.
fn code_unit_key(path: &Path) -> Option<String> {
    let unit = if path.file_stem().is_some_and(|stem| stem == "mod") {
        path.parent()?
    } else {
        path
    };
    let name = if unit.is_dir() {
        unit.file_name()?
    } else {
        unit.file_stem()?
    };
    name.to_str().map(str::to_string)
}

/// Replace every character that is not ASCII alphanumeric with `_`.
pub fn normalize_module_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
