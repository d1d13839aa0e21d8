// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability registry: the category name -> contract binding table.
//!
//! The registry is a plain value handed to the loader at construction. Its
//! enumeration order is the order in which categories are processed, which
//! also decides whose constructor arguments a multi-category plugin gets.

use strata_core::{Contract, StrataError};
use strum::IntoEnumIterator;

/// Ordered, one-to-one mapping of category names to contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    bindings: Vec<(String, Contract)>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CapabilityRegistry {
    /// An empty registry; binds nothing.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// The five built-in categories, each named after its contract.
    pub fn builtin() -> Self {
        Self {
            bindings: Contract::iter().map(|c| (c.to_string(), c)).collect(),
        }
    }

    /// Build a registry from `(category, contract)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, StrataError>
    where
        I: IntoIterator<Item = (S, Contract)>,
        S: Into<String>,
    {
        let mut registry = Self::empty();
        for (name, contract) in pairs {
            registry.bind(name, contract)?;
        }
        Ok(registry)
    }

    /// Add a binding. Both the name and the contract must be unbound.
    pub fn bind(&mut self, category: impl Into<String>, contract: Contract) -> Result<(), StrataError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(StrataError::Config(
                "capability category name must not be empty".to_string(),
            ));
        }
        if let Some((_, existing)) = self.bindings.iter().find(|(name, _)| *name == category) {
            return Err(StrataError::Config(format!(
                "category `{category}` is already bound to {existing}"
            )));
        }
        if let Some((name, _)) = self.bindings.iter().find(|(_, c)| *c == contract) {
            return Err(StrataError::Config(format!(
                "contract {contract} is already bound to category `{name}`"
            )));
        }
        self.bindings.push((category, contract));
        Ok(())
    }

    pub fn contract_of(&self, category: &str) -> Option<Contract> {
        self.bindings
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, c)| *c)
    }

    pub fn category_of(&self, contract: Contract) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, c)| *c == contract)
            .map(|(name, _)| name.as_str())
    }

    /// Bindings in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Contract)> {
        self.bindings.iter().map(|(name, c)| (name.as_str(), *c))
    }

    pub fn category_names(&self) -> Vec<String> {
        self.bindings.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
