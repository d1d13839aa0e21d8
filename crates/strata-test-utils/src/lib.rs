// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strata integration tests.
//!
//! # Components
//!
//! - [`MockModule`] - compiled-in plugin module with scripted import and factory behavior
//! - [`MockPlugin`] - plugin instance implementing any subset of the contracts
//! - [`PluginTree`] - temporary plugin root populated with descriptors

pub mod harness;
pub mod mock_plugin;

pub use harness::PluginTree;
pub use mock_plugin::{Creation, CreationLog, MockExport, MockModule, MockPlugin, Outcome};
