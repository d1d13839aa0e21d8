// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat SQLite storage plugin.
//!
//! Stores each data item as JSON together with its schema and metadata.
//! A new version of a record is written only when its fingerprint differs
//! from the latest stored version, so storing the same items twice is a
//! no-op.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use strata_core::{ArgSpec, DataItem, PluginAdapter, StorageAdapter, StrataError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::database::Database;
use crate::fingerprint::fingerprint;
use crate::models::{PendingRecord, StoredRecord};
use crate::queries;

/// Plugin name used in policy lists and `plugin_config`.
pub const PLUGIN_NAME: &str = "sqlite-flat";

/// Database file used when no `database_path` argument is given.
pub const DEFAULT_DATABASE_PATH: &str = "strata_flat_storage.db";

/// SQLite-backed storage with content-fingerprint versioning.
///
/// The database is opened lazily on first use.
pub struct SqliteFlatStorage {
    database_path: PathBuf,
    db: OnceCell<Database>,
}

impl SqliteFlatStorage {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            db: OnceCell::new(),
        }
    }

    /// Build from constructor arguments.
    ///
    /// Accepts `{ database_path = "..." }`, `["..."]` or no arguments.
    ///
    /// The path is used as given. A relative path, including the default
    /// `strata_flat_storage.db`, resolves against the process working
    /// directory when the database is first opened, not against the config
    /// file's directory. Use an absolute path to pin the location.
    pub fn from_args(args: &ArgSpec) -> Result<Self, StrataError> {
        let invalid = |message: String| StrataError::Instantiation {
            category: "Storage".to_string(),
            plugin: PLUGIN_NAME.to_string(),
            message,
        };

        match args {
            ArgSpec::Named(map) => {
                if let Some(unknown) = map.keys().find(|k| k.as_str() != "database_path") {
                    return Err(invalid(format!("unexpected argument `{unknown}`")));
                }
            }
            ArgSpec::Positional(values) if values.len() > 1 => {
                return Err(invalid(format!(
                    "expected at most 1 positional argument, got {}",
                    values.len()
                )));
            }
            _ => {}
        }

        match args.get("database_path", 0) {
            None => Ok(Self::new(DEFAULT_DATABASE_PATH)),
            Some(Value::String(path)) if !path.trim().is_empty() => Ok(Self::new(path)),
            Some(other) => Err(invalid(format!(
                "`database_path` must be a non-empty string, got {other}"
            ))),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    async fn db(&self) -> Result<&Database, StrataError> {
        self.db
            .get_or_try_init(|| Database::open(&self.database_path))
            .await
    }

    /// Every stored version of one record, oldest first.
    pub async fn history(
        &self,
        data_model_name: &str,
        uid: &str,
    ) -> Result<Vec<StoredRecord>, StrataError> {
        queries::records::versions(self.db().await?, data_model_name, uid).await
    }

    /// Total number of stored versions for a model.
    pub async fn version_count(&self, data_model_name: &str) -> Result<i64, StrataError> {
        queries::records::count_versions(self.db().await?, data_model_name).await
    }
}

impl std::fmt::Debug for SqliteFlatStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteFlatStorage")
            .field("database_path", &self.database_path)
            .field("open", &self.db.initialized())
            .finish()
    }
}

impl PluginAdapter for SqliteFlatStorage {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn as_storage(&self) -> Option<&dyn StorageAdapter> {
        Some(self)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, StrataError> {
    serde_json::to_string(value).map_err(|e| StrataError::Storage {
        source: Box::new(e),
    })
}

#[async_trait]
impl StorageAdapter for SqliteFlatStorage {
    fn can_store(&self, _model_name: &str, _schema: &Value) -> bool {
        true
    }

    async fn store(
        &self,
        items: &[DataItem],
        model_name: &str,
        schema: &Value,
    ) -> Result<(), StrataError> {
        let data_model = to_json(schema)?;
        let pending = items
            .iter()
            .map(|item| {
                let data_item = to_json(&item.record.fields)?;
                let data_item_metadata = to_json(&item.record.metadata)?;
                let checksum = fingerprint(&data_model, &data_item, &data_item_metadata);
                Ok(PendingRecord {
                    uid: item.id.clone(),
                    data_item,
                    data_item_metadata,
                    checksum,
                })
            })
            .collect::<Result<Vec<_>, StrataError>>()?;

        let created = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        let written =
            queries::records::upsert_versions(self.db().await?, model_name, &data_model, &created, pending)
                .await?;

        debug!(
            model = model_name,
            items = items.len(),
            written,
            "stored data items"
        );
        Ok(())
    }
}
