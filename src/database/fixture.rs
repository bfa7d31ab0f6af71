// ABOUTME: JSON catalog fixture format and the loader that seeds it into SQLite
// ABOUTME: Used by the kibble-seed binary and by integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::CatalogDatabase;
use kibble_core::errors::{AppError, AppResult};
use kibble_core::models::{FixedIngredient, NutrientProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One selectable ingredient in a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureIngredient {
    /// Ingredient name
    pub name: String,
    /// Free-form group tag, stored verbatim
    pub group: String,
    /// Nutrients per 100 g DM
    #[serde(flatten)]
    pub profile: NutrientProfile,
}

/// One fixed-base ingredient in a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureFixed {
    /// Ingredient name
    pub name: String,
    /// Fixed DM in grams
    pub dm_g: f64,
    /// Nutrients per 100 g DM
    #[serde(flatten)]
    pub profile: NutrientProfile,
}

/// Catalog fixture: selectable ingredients plus the fixed base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    /// Selectable ingredients
    #[serde(default)]
    pub ingredients: Vec<FixtureIngredient>,
    /// Fixed base, in report order
    #[serde(default)]
    pub fixed: Vec<FixtureFixed>,
}

/// Counts written by [`CatalogFixture::seed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Selectable ingredients upserted
    pub ingredients: usize,
    /// Fixed ingredients upserted
    pub fixed: usize,
}

impl CatalogFixture {
    /// Parse a fixture from JSON text
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the JSON is malformed
    pub fn from_json(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: &Path) -> AppResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!("Failed to read fixture {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Upsert every fixture row into `database`
    ///
    /// Fixed ingredients are stored with their fixture index as position.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed write
    pub async fn seed(&self, database: &CatalogDatabase) -> AppResult<SeedSummary> {
        for ingredient in &self.ingredients {
            database
                .upsert_ingredient(&ingredient.name, &ingredient.group, &ingredient.profile)
                .await?;
        }
        for (position, fixed) in (0_i64..).zip(&self.fixed) {
            let fixed = FixedIngredient::new(fixed.name.clone(), fixed.dm_g, fixed.profile);
            database.upsert_fixed_ingredient(&fixed, position).await?;
        }

        let summary = SeedSummary {
            ingredients: self.ingredients.len(),
            fixed: self.fixed.len(),
        };
        info!(
            ingredients = summary.ingredients,
            fixed = summary.fixed,
            "Catalog fixture seeded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses_flattened_profiles() {
        let fixture = CatalogFixture::from_json(
            r#"{
                "ingredients": [
                    {"name": "Carrot", "group": "Vegetable A", "fiber_g": 28.0, "protein_g": 9.0}
                ],
                "fixed": [
                    {"name": "Bone Meal", "dm_g": 12.5, "calcium_mg": 30000.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(fixture.ingredients[0].group, "Vegetable A");
        assert!((fixture.ingredients[0].profile.fiber_g - 28.0).abs() < f64::EPSILON);
        assert!(fixture.ingredients[0].profile.fat_g.abs() < f64::EPSILON);
        assert!((fixture.fixed[0].dm_g - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixture_rejects_malformed_json() {
        assert!(CatalogFixture::from_json("{\"ingredients\": [").is_err());
    }
}
