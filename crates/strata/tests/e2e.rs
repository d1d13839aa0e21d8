// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration file, plugin tree on disk, compiled-in
//! modules, and the resulting pipeline registry.
//!
//! Each test builds its own temporary tree, so tests are independent and
//! order-insensitive.

use std::path::Path;

use proptest::prelude::*;
use serde_json::json;
use strata::{
    Contract, DataItem, LoadOutcome, ModuleCatalog, PluginState, Record, SqliteFlatStorage,
    StorageAdapter, StrataError, builtin_catalog, collect_plugins,
};
use strata_test_utils::{MockModule, PluginTree};

/// Add `names` in discovery order, each backed by a module exporting `contracts`.
fn populate(tree: &PluginTree, names: &[&str], contracts: &[Contract]) -> ModuleCatalog {
    let mut catalog = ModuleCatalog::new();
    for (i, name) in names.iter().enumerate() {
        let module = format!("{name}_mod");
        tree.add_in(&format!("{i:02}_{name}"), name, &module).unwrap();
        catalog.register(
            module,
            MockModule::new().export(&format!("{name}Stage"), contracts).build(),
        );
    }
    catalog
}

fn load(tree: &PluginTree, config: &str, catalog: ModuleCatalog) -> LoadOutcome {
    let path = tree.write_config(config).unwrap();
    collect_plugins(&path, catalog, None).unwrap()
}

// ---- Cardinality and isolation ----

#[test]
fn one_info_per_candidate_despite_failures() {
    let tree = PluginTree::new().unwrap();
    tree.add_in("a", "Good1", "good1").unwrap();
    tree.add_in("b", "Broken", "broken").unwrap();
    tree.add_in("c", "Good2", "good2").unwrap();
    tree.add_in("d", "Unregistered", "nowhere").unwrap();

    let catalog = ModuleCatalog::new()
        .with("good1", MockModule::new().export("Good1", &[Contract::Validation]).build())
        .with("broken", MockModule::failing_import("syntax error").build())
        .with("good2", MockModule::new().export("Good2", &[Contract::Validation]).build());

    let outcome = load(&tree, "", catalog);

    assert_eq!(outcome.plugins.len(), 4);
    let names: Vec<&str> = outcome.plugins.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Good1", "Broken", "Good2", "Unregistered"]);
    assert_eq!(outcome.plugins[1].state(), PluginState::ImportFailed);
    assert_eq!(outcome.plugins[3].state(), PluginState::ImportFailed);
    assert_eq!(outcome.registry.names("Validation"), ["Good1", "Good2"]);

    let summary = outcome.summary();
    assert_eq!(summary.loaded, 2);
    assert_eq!(summary.import_failed, 2);
    assert_eq!(outcome.failed().count(), 2);
}

#[test]
fn panicking_import_is_isolated() {
    let tree = PluginTree::new().unwrap();
    tree.add_in("a", "Good1", "good1").unwrap();
    tree.add_in("b", "Explodes", "explodes").unwrap();
    tree.add_in("c", "Good2", "good2").unwrap();

    let catalog = ModuleCatalog::new()
        .with("good1", MockModule::new().export("Good1", &[Contract::Storage]).build())
        .with("explodes", MockModule::panicking_import("kaboom").build())
        .with("good2", MockModule::new().export("Good2", &[Contract::Storage]).build());

    let outcome = load(&tree, "", catalog);

    assert_eq!(outcome.plugins.len(), 3);
    let error = outcome.plugins[1].error().unwrap();
    assert!(matches!(error, StrataError::Import { .. }));
    assert!(error.to_string().contains("kaboom"));
    assert_eq!(outcome.registry.names("Storage"), ["Good1", "Good2"]);
}

#[test]
fn instantiation_failure_in_one_category_keeps_the_other() {
    let tree = PluginTree::new().unwrap();
    tree.add("Mixed", "mixed").unwrap();
    let catalog = ModuleCatalog::new().with(
        "mixed",
        MockModule::new()
            .export("Check", &[Contract::Validation])
            .failing_factory("Persist", &[Contract::Storage], "disk full")
            .build(),
    );

    let outcome = load(&tree, "", catalog);

    let info = &outcome.plugins[0];
    assert_eq!(info.categories(), ["Validation"]);
    assert_eq!(info.failures.len(), 1);
    assert_eq!(info.failures[0].category, "Storage");
    assert!(info.failures[0].error.to_string().contains("disk full"));
    assert_eq!(outcome.registry.names("Validation"), ["Mixed"]);
    assert!(outcome.registry.get("Storage").is_empty());
}

// ---- Inclusion policy ----

#[test]
fn whitelist_with_empty_list_includes_nothing() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B"], &[Contract::Extraction]);

    let outcome = load(
        &tree,
        "[plugins]\nmode = \"whitelist\"\nExtraction = []\n",
        catalog,
    );

    assert!(outcome.registry.get("Extraction").is_empty());
    assert!(outcome.plugins.iter().all(|p| p.state() == PluginState::Ignored));
}

#[test]
fn blacklist_with_empty_list_includes_everything() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B", "C"], &[Contract::Extraction]);

    let outcome = load(&tree, "[plugins]\nmode = \"blacklist\"\nExtraction = []\n", catalog);

    assert_eq!(outcome.registry.names("Extraction"), ["A", "B", "C"]);
}

#[test]
fn inclusion_is_decided_per_category() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["Both"], &[Contract::Validation, Contract::Storage]);

    let outcome = load(
        &tree,
        "[plugins]\nmode = \"whitelist\"\nValidation = [\"Both\"]\n",
        catalog,
    );

    assert_eq!(outcome.registry.names("Validation"), ["Both"]);
    assert!(outcome.registry.get("Storage").is_empty());
    assert_eq!(
        outcome.plugins[0].state(),
        PluginState::Loaded {
            categories: vec!["Validation".to_string()]
        }
    );
}

#[test]
fn blacklisted_plugin_is_not_instantiated() {
    let tree = PluginTree::new().unwrap();
    tree.add("Skip", "skip").unwrap();
    let module = MockModule::new().export("Skip", &[Contract::PostProcessing]);
    let log = module.log();
    let catalog = ModuleCatalog::new().with("skip", module.build());

    let outcome = load(&tree, "[plugins]\nPostProcessing = [\"Skip\"]\n", catalog);

    assert_eq!(outcome.plugins[0].state(), PluginState::Ignored);
    assert_eq!(log.count(), 0);
}

#[test]
fn multi_category_plugin_shares_one_instance() {
    let tree = PluginTree::new().unwrap();
    tree.add("Hybrid", "hybrid").unwrap();
    let module = MockModule::new().export("Hybrid", &[Contract::Validation, Contract::Storage]);
    let log = module.log();
    let catalog = ModuleCatalog::new().with("hybrid", module.build());

    let outcome = load(
        &tree,
        "[plugin_config.Validation.Hybrid]\nstrict = true\n",
        catalog,
    );

    assert_eq!(log.count(), 1);
    assert_eq!(log.creations()[0].args.get("strict", 0), Some(&json!(true)));
    assert_eq!(outcome.registry.all().len(), 1);
    let validation = &outcome.registry.get("Validation")[0];
    let storage = &outcome.registry.get("Storage")[0];
    assert!(std::sync::Arc::ptr_eq(&validation.instance, &storage.instance));
}

// ---- Ordering ----

#[test]
fn explicit_order_is_a_stable_sort() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B", "D"], &[Contract::Validation]);

    let outcome = load(&tree, "[plugin_order]\nValidation = [\"B\", \"A\"]\n", catalog);

    assert_eq!(outcome.registry.names("Validation"), ["B", "A", "D"]);
}

#[test]
fn unnamed_plugins_keep_discovery_order_after_named_ones() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B", "C", "D", "E"], &[Contract::Storage]);

    let outcome = load(&tree, "[plugin_order]\nStorage = [\"D\", \"Missing\"]\n", catalog);

    assert_eq!(outcome.registry.names("Storage"), ["D", "A", "B", "C", "E"]);
}

#[test]
fn repeated_loads_are_identical() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B", "C"], &[Contract::Validation, Contract::Storage]);
    let path = tree
        .write_config("[plugin_order]\nStorage = [\"C\"]\nValidation = [\"B\"]\n")
        .unwrap();

    let mut manager =
        strata::manager_from_path(&path, strata::CapabilityRegistry::builtin(), catalog).unwrap();
    let first = manager.collect_plugins(None).unwrap();
    let second = manager.collect_plugins(None).unwrap();

    for category in ["Validation", "Storage"] {
        assert_eq!(first.registry.names(category), second.registry.names(category));
    }
    assert_eq!(first.registry.names("Storage"), ["C", "A", "B"]);
    assert_ne!(first.plugins[0].module_id, second.plugins[0].module_id);
}

#[test]
fn progress_callback_sees_every_candidate() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A", "B"], &[Contract::DataModel]);
    let path = tree.write_config("").unwrap();

    let mut seen = Vec::new();
    let mut on_progress = |candidate: &strata::PluginCandidate| seen.push(candidate.name().to_string());
    let outcome = collect_plugins(&path, catalog, Some(&mut on_progress)).unwrap();

    assert_eq!(outcome.plugins.len(), 2);
    assert_eq!(seen, ["A", "B"]);
}

// ---- Configuration failures ----

#[test]
fn unknown_category_is_fatal_with_suggestion() {
    let tree = PluginTree::new().unwrap();
    let path = tree
        .write_config("[plugin_order]\nValidaton = [\"A\"]\n")
        .unwrap();

    let err = collect_plugins(&path, ModuleCatalog::new(), None).unwrap_err();
    assert!(err.is_fatal());
    let message = err.to_string();
    assert!(message.contains("Validaton"), "got: {message}");
    assert!(message.contains("did you mean `Validation`?"), "got: {message}");
}

#[test]
fn missing_config_file_is_fatal() {
    let tree = PluginTree::new().unwrap();
    let err = collect_plugins(&tree.path().join("absent.toml"), ModuleCatalog::new(), None)
        .unwrap_err();
    assert!(matches!(err, StrataError::Config(_)));
}

#[test]
fn missing_plugin_root_yields_no_candidates() {
    let tree = PluginTree::new().unwrap();
    let path = tree.path().join("strata.toml");
    std::fs::write(&path, "plugin_roots = [\"does-not-exist\"]\n").unwrap();

    let outcome = collect_plugins(&path, ModuleCatalog::new(), None).unwrap();
    assert!(outcome.plugins.is_empty());
}

#[test]
fn unparsable_descriptor_is_skipped() {
    let tree = PluginTree::new().unwrap();
    let catalog = populate(&tree, &["A"], &[Contract::Validation]);
    tree.add_raw("zz/bad.strata-plugin.toml", "[plugin\nname = ").unwrap();

    let outcome = load(&tree, "", catalog);
    assert_eq!(outcome.plugins.len(), 1);
    assert_eq!(outcome.registry.names("Validation"), ["A"]);
}

// ---- Reference storage ----

fn item(id: &str, value: i64) -> DataItem {
    let mut fields = serde_json::Map::new();
    fields.insert("value".to_string(), json!(value));
    DataItem::new(id, Record::new(fields))
}

fn flat_storage_config(db: &Path) -> String {
    format!(
        "[plugin_config.Storage.sqlite-flat]\ndatabase_path = '{}'\n",
        db.display()
    )
}

#[tokio::test]
async fn flat_storage_loaded_from_tree_is_idempotent() {
    let tree = PluginTree::new().unwrap();
    tree.add("sqlite-flat", strata_storage::MODULE_NAME).unwrap();
    let db = tree.path().join("data/flat.db");

    let outcome = load(&tree, &flat_storage_config(&db), builtin_catalog());
    assert_eq!(outcome.registry.names("Storage"), ["sqlite-flat"]);

    let schema = json!({ "value": "integer" });
    let items = vec![item("a", 1), item("b", 2)];
    let storages: Vec<_> = outcome.registry.storages().collect();
    assert_eq!(storages.len(), 1);
    let storage = storages[0];
    assert!(storage.can_store("numbers", &schema));

    storage.store(&items, "numbers", &schema).await.unwrap();
    storage.store(&items, "numbers", &schema).await.unwrap();

    let reader = SqliteFlatStorage::new(&db);
    assert_eq!(reader.version_count("numbers").await.unwrap(), 2);

    storage
        .store(&[item("a", 10)], "numbers", &schema)
        .await
        .unwrap();
    assert_eq!(reader.version_count("numbers").await.unwrap(), 3);
    assert_eq!(reader.history("numbers", "a").await.unwrap().len(), 2);
}

#[test]
fn flat_storage_rejects_unknown_arguments() {
    let tree = PluginTree::new().unwrap();
    tree.add("sqlite-flat", strata_storage::MODULE_NAME).unwrap();

    let outcome = load(
        &tree,
        "[plugin_config.Storage.sqlite-flat]\npath = 'x.db'\n",
        builtin_catalog(),
    );

    let info = &outcome.plugins[0];
    assert_eq!(info.state(), PluginState::InstantiationFailed);
    assert!(matches!(
        info.error(),
        Some(StrataError::Instantiation { .. })
    ));
    assert!(outcome.registry.get("Storage").is_empty());
}

// ---- Properties ----

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn load_preserves_cardinality_and_orders_stably(
        broken in proptest::collection::vec(any::<bool>(), 1..6),
        order in proptest::sample::subsequence((0..6usize).collect::<Vec<_>>(), 0..4),
    ) {
        let tree = PluginTree::new().unwrap();
        let names: Vec<String> = (0..broken.len()).map(|i| format!("P{i}")).collect();

        let mut catalog = ModuleCatalog::new();
        for (i, name) in names.iter().enumerate() {
            let module = format!("p{i}_mod");
            tree.add_in(&format!("{i:02}"), name, &module).unwrap();
            let built = if broken[i] {
                MockModule::failing_import("broken")
            } else {
                MockModule::new().export(name, &[Contract::Validation])
            };
            catalog.register(module, built.build());
        }

        let ordered: Vec<String> = order.iter().rev().map(|i| format!("P{i}")).collect();
        let listed = ordered
            .iter()
            .map(|n| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let outcome = load(&tree, &format!("[plugin_order]\nValidation = [{listed}]\n"), catalog);

        prop_assert_eq!(outcome.plugins.len(), names.len());
        prop_assert_eq!(outcome.summary().import_failed, broken.iter().filter(|b| **b).count());

        let loaded: Vec<&String> = names
            .iter()
            .zip(&broken)
            .filter(|(_, b)| !**b)
            .map(|(n, _)| n)
            .collect();
        let mut expected: Vec<&str> = ordered
            .iter()
            .filter(|n| loaded.contains(n))
            .map(String::as_str)
            .collect();
        expected.extend(
            loaded
                .iter()
                .filter(|n| !ordered.contains(n))
                .map(|n| n.as_str()),
        );
        prop_assert_eq!(outcome.registry.names("Validation"), expected);
    }
}
