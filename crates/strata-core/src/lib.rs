// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strata plugin pipeline.
//!
//! This crate provides the capability contracts, the error taxonomy and the
//! common record types used throughout the Strata workspace. Every plugin
//! implements traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrataError;
pub use types::{ArgSpec, Contract, DataItem, DataModel, Record};

pub use traits::{
    DataModelAdapter, ExtractionAdapter, PluginAdapter, PostProcessingAdapter, StorageAdapter,
    ValidationAdapter,
};
