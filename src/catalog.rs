// ABOUTME: Ingredient catalog collaborator trait and an in-memory implementation
// ABOUTME: Name, group and bulk lookups plus the fixed base; misses are absent, not errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Catalog
//!
//! The engine never talks to storage. The formulation service reads everything
//! a request needs through [`IngredientCatalog`] once, up front. Only
//! infrastructure failures are errors; an unknown name is simply absent.

use async_trait::async_trait;
use kibble_core::errors::AppResult;
use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog listing row returned by `GET /ingredients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogListing {
    /// Ingredient name as stored
    pub ingredient_name: String,
    /// Group tag as stored
    pub group_name: String,
}

/// Read-only access to ingredient data
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    /// Every catalog ingredient with its stored group tag
    async fn list_ingredients(&self) -> AppResult<Vec<CatalogListing>>;

    /// Exact-name lookup
    async fn lookup_by_name(&self, name: &str) -> AppResult<Option<CandidateIngredient>>;

    /// All ingredients whose tag parses to `group`
    async fn lookup_by_group(&self, group: FoodGroup) -> AppResult<Vec<CandidateIngredient>>;

    /// All ingredients whose tag parses to any of `groups`
    async fn lookup_by_groups(&self, groups: &[FoodGroup]) -> AppResult<Vec<CandidateIngredient>> {
        let mut found = Vec::new();
        for group in groups {
            found.extend(self.lookup_by_group(*group).await?);
        }
        Ok(found)
    }

    /// Case-insensitive bulk lookup, returned in the order of `names`
    async fn lookup_by_names(&self, names: &[String]) -> AppResult<Vec<CandidateIngredient>>;

    /// The immutable fixed base
    async fn load_fixed_ingredients(&self) -> AppResult<Vec<FixedIngredient>>;
}

/// Order `found` to follow `names`, matching case-insensitively
pub(crate) fn order_by_names(names: &[String], found: Vec<CandidateIngredient>) -> Vec<CandidateIngredient> {
    let mut by_name: HashMap<String, CandidateIngredient> = HashMap::new();
    for candidate in found {
        by_name.entry(candidate.name.to_lowercase()).or_insert(candidate);
    }
    names
        .iter()
        .filter_map(|n| by_name.remove(&n.to_lowercase()))
        .collect()
}

/// Catalog held entirely in memory
///
/// Backs tests and benchmarks; also handy for embedding the engine without a
/// database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    ingredients: Vec<(CandidateIngredient, String)>,
    fixed: Vec<FixedIngredient>,
}

impl InMemoryCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingredient under its canonical group tag
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: CandidateIngredient) -> Self {
        let tag = ingredient.group.as_str().to_owned();
        self.ingredients.push((ingredient, tag));
        self
    }

    /// Add a fixed-base ingredient
    #[must_use]
    pub fn with_fixed(mut self, fixed: FixedIngredient) -> Self {
        self.fixed.push(fixed);
        self
    }
}

#[async_trait]
impl IngredientCatalog for InMemoryCatalog {
    async fn list_ingredients(&self) -> AppResult<Vec<CatalogListing>> {
        Ok(self
            .ingredients
            .iter()
            .map(|(c, tag)| CatalogListing {
                ingredient_name: c.name.clone(),
                group_name: tag.clone(),
            })
            .collect())
    }

    async fn lookup_by_name(&self, name: &str) -> AppResult<Option<CandidateIngredient>> {
        Ok(self
            .ingredients
            .iter()
            .find(|(c, _)| c.name == name)
            .map(|(c, _)| c.clone()))
    }

    async fn lookup_by_group(&self, group: FoodGroup) -> AppResult<Vec<CandidateIngredient>> {
        Ok(self
            .ingredients
            .iter()
            .filter(|(c, _)| c.group == group)
            .map(|(c, _)| c.clone())
            .collect())
    }

    async fn lookup_by_names(&self, names: &[String]) -> AppResult<Vec<CandidateIngredient>> {
        let found = self.ingredients.iter().map(|(c, _)| c.clone()).collect();
        Ok(order_by_names(names, found))
    }

    async fn load_fixed_ingredients(&self) -> AppResult<Vec<FixedIngredient>> {
        Ok(self.fixed.clone())
    }
}
