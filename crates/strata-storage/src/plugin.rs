// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled-in module registration for the flat storage plugin.

use std::sync::Arc;

use strata_core::{ArgSpec, Contract, PluginAdapter, StrataError};
use strata_plugin::{ModuleCatalog, PluginExport, PluginModule};

use crate::adapter::SqliteFlatStorage;

/// Catalog key: a descriptor with `module = "sqlite_flat"` resolves here.
pub const MODULE_NAME: &str = "sqlite_flat";

/// Export list of the module: one storage symbol.
pub fn sqlite_flat_exports() -> Result<Vec<PluginExport>, StrataError> {
    Ok(vec![PluginExport::new(
        "SqliteFlatStorage",
        &[Contract::Storage],
        |args: &ArgSpec| -> Result<Arc<dyn PluginAdapter>, StrataError> {
            Ok(Arc::new(SqliteFlatStorage::from_args(args)?))
        },
    )])
}

pub fn sqlite_flat_module() -> Arc<dyn PluginModule> {
    Arc::new(sqlite_flat_exports)
}

/// Register the module under [`MODULE_NAME`].
pub fn register(catalog: &mut ModuleCatalog) {
    catalog.register(MODULE_NAME, sqlite_flat_module());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_plugin::PluginFactory;

    #[test]
    fn export_builds_storage_instance() {
        let exports = sqlite_flat_exports().unwrap();
        assert_eq!(exports.len(), 1);
        assert!(exports[0].implements(Contract::Storage));

        let instance = exports[0]
            .factory
            .create(&ArgSpec::Positional(vec![json!("x.db")]))
            .unwrap();
        assert!(instance.provides(Contract::Storage));
        assert_eq!(instance.name(), "sqlite-flat");
    }

    #[test]
    fn register_uses_module_name() {
        let mut catalog = ModuleCatalog::new();
        register(&mut catalog);
        assert!(catalog.get(MODULE_NAME).is_some());
    }
}
