// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned record operations.

use std::collections::HashMap;

use rusqlite::{Row, params};
use strata_core::StrataError;

use crate::database::{Database, map_tr_err};
use crate::models::{PendingRecord, StoredRecord};

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        data_model_name: row.get(0)?,
        uid: row.get(1)?,
        version: row.get(2)?,
        created: row.get(3)?,
        data_model: row.get(4)?,
        data_item: row.get(5)?,
        data_item_metadata: row.get(6)?,
        checksum: row.get(7)?,
    })
}

/// Write a new version for every pending record whose checksum differs
/// from the latest stored version of its uid.
///
/// Runs in one transaction. Returns the number of versions written.
pub async fn upsert_versions(
    db: &Database,
    data_model_name: &str,
    data_model: &str,
    created: &str,
    pending: Vec<PendingRecord>,
) -> Result<usize, StrataError> {
    let data_model_name = data_model_name.to_string();
    let data_model = data_model.to_string();
    let created = created.to_string();

    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut latest: HashMap<String, (i64, String)> = HashMap::new();
            {
                let mut stmt = tx.prepare(
                    "SELECT s.uid, s.version, s.checksum FROM storage s
                     WHERE s.data_model_name = ?1
                       AND s.version = (SELECT MAX(version) FROM storage
                                        WHERE data_model_name = s.data_model_name AND uid = s.uid)",
                )?;
                let rows = stmt.query_map(params![data_model_name], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
                })?;
                for row in rows {
                    let (uid, version, checksum) = row?;
                    latest.insert(uid, (version, checksum));
                }
            }

            let mut written = 0;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO storage (data_model_name, uid, version, created, data_model,
                                          data_item, data_item_metadata, checksum)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for record in pending {
                    let current = latest.get(&record.uid);
                    if current.is_some_and(|(_, checksum)| *checksum == record.checksum) {
                        continue;
                    }
                    let version = current.map_or(1, |(v, _)| v + 1);
                    insert.execute(params![
                        data_model_name,
                        record.uid,
                        version,
                        created,
                        data_model,
                        record.data_item,
                        record.data_item_metadata,
                        record.checksum,
                    ])?;
                    latest.insert(record.uid, (version, record.checksum));
                    written += 1;
                }
            }

            tx.commit()?;
            Ok(written)
        })
        .await
        .map_err(map_tr_err)
}

/// All versions of one record, oldest first.
pub async fn versions(
    db: &Database,
    data_model_name: &str,
    uid: &str,
) -> Result<Vec<StoredRecord>, StrataError> {
    let data_model_name = data_model_name.to_string();
    let uid = uid.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<StoredRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT data_model_name, uid, version, created, data_model,
                        data_item, data_item_metadata, checksum
                 FROM storage WHERE data_model_name = ?1 AND uid = ?2
                 ORDER BY version ASC",
            )?;
            let rows = stmt.query_map(params![data_model_name, uid], row_to_record)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// The latest version of one record, if any.
pub async fn latest(
    db: &Database,
    data_model_name: &str,
    uid: &str,
) -> Result<Option<StoredRecord>, StrataError> {
    Ok(versions(db, data_model_name, uid).await?.pop())
}

/// Number of stored versions across all records of a model.
pub async fn count_versions(db: &Database, data_model_name: &str) -> Result<i64, StrataError> {
    let data_model_name = data_model_name.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM storage WHERE data_model_name = ?1",
                params![data_model_name],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
