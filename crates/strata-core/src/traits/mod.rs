// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contract definitions for the Strata plugin pipeline.
//!
//! Every contract extends the [`PluginAdapter`] base trait. Contracts with
//! I/O use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod datamodel;
pub mod extraction;
pub mod postprocessing;
pub mod storage;
pub mod validation;

pub use adapter::PluginAdapter;
pub use datamodel::DataModelAdapter;
pub use extraction::ExtractionAdapter;
pub use postprocessing::PostProcessingAdapter;
pub use storage::StorageAdapter;
pub use validation::ValidationAdapter;
