// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by contracts, the loader and the configuration layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

/// The closed set of capability contracts a plugin can implement.
///
/// Adding a contract requires a code change; which category name binds to
/// which contract is decided by the capability registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Contract {
    DataModel,
    Extraction,
    PostProcessing,
    Validation,
    Storage,
}

/// Constructor arguments resolved for one plugin.
///
/// Configuration maps a sequence to `Positional`, a table to `Named` and an
/// absent entry to `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum ArgSpec {
    #[default]
    None,
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl ArgSpec {
    /// Look up an argument by name, falling back to a position.
    ///
    /// Lets factories accept both `{ path = "x" }` and `["x"]`.
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        match self {
            ArgSpec::None => None,
            ArgSpec::Positional(values) => values.get(position),
            ArgSpec::Named(map) => map.get(name),
        }
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        match self {
            ArgSpec::None => 0,
            ArgSpec::Positional(values) => values.len(),
            ArgSpec::Named(map) => map.len(),
        }
    }

    /// Returns true if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de> Deserialize<'de> for ArgSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(ArgSpec::None),
            Value::Array(values) => Ok(ArgSpec::Positional(values)),
            Value::Object(map) => Ok(ArgSpec::Named(map)),
            other => Err(serde::de::Error::custom(format!(
                "plugin arguments must be a sequence or a table, got `{other}`"
            ))),
        }
    }
}

/// A named data model and its schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    pub name: String,
    pub schema: Value,
}

/// A single extracted record with its field values and bookkeeping metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            metadata: Map::new(),
        }
    }

    /// Builder-style metadata setter.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// An (identifier, record) pair flowing through the pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub id: String,
    pub record: Record,
}

impl DataItem {
    pub fn new(id: impl Into<String>, record: Record) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}
