// ABOUTME: Formulation service loading a request snapshot from the catalog and running the engine
// ABOUTME: One bulk catalog read per request; the engine itself never touches storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::catalog::{CatalogListing, IngredientCatalog};
use crate::logging::AppLogger;
use kibble_core::errors::AppResult;
use kibble_core::models::FoodGroup;
use kibble_formulation::{dedupe_names, formulate, CatalogSnapshot, FormulationConfig, FormulationReport};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs formulation requests against an ingredient catalog
///
/// Every request builds its own [`CatalogSnapshot`]; nothing mutable is shared
/// between concurrent calls.
pub struct FormulationService<C: ?Sized = dyn IngredientCatalog> {
    catalog: Arc<C>,
    config: FormulationConfig,
}

impl<C: ?Sized> Clone for FormulationService<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            config: self.config.clone(),
        }
    }
}

impl<C: IngredientCatalog + ?Sized> FormulationService<C> {
    /// Create a service over `catalog`
    #[must_use]
    pub const fn new(catalog: Arc<C>, config: FormulationConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine configuration in use
    #[must_use]
    pub const fn config(&self) -> &FormulationConfig {
        &self.config
    }

    /// Catalog listing for `GET /ingredients`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read
    pub async fn list_ingredients(&self) -> AppResult<Vec<CatalogListing>> {
        self.catalog.list_ingredients().await
    }

    /// Load everything one request needs from the catalog
    ///
    /// Names are deduplicated keeping their first occurrence, then resolved
    /// individually so request order is preserved. Names the catalog does not
    /// know end up in `unresolved`.
    ///
    /// # Errors
    ///
    /// Returns an error if any catalog read fails
    pub async fn build_snapshot<S: AsRef<str> + Sync>(&self, names: &[S]) -> AppResult<CatalogSnapshot> {
        let names = dedupe_names(names);

        let mut selected = Vec::with_capacity(names.len());
        let mut unresolved = Vec::new();
        for name in names {
            match self.catalog.lookup_by_name(&name).await? {
                Some(candidate) => selected.push(candidate),
                None => unresolved.push(name),
            }
        }

        let meat_catalog = self.catalog.lookup_by_groups(&FoodGroup::MEATS).await?;

        let fiber_boosters = self
            .catalog
            .lookup_by_names(&self.config.fiber.booster_names)
            .await?;

        let fixed = self.catalog.load_fixed_ingredients().await?;
        if fixed.is_empty() {
            warn!("Fixed ingredient base is empty; formulating from selected ingredients only");
        }

        debug!(
            selected = selected.len(),
            unresolved = unresolved.len(),
            meat_catalog = meat_catalog.len(),
            fiber_boosters = fiber_boosters.len(),
            fixed = fixed.len(),
            "Catalog snapshot loaded"
        );

        Ok(CatalogSnapshot {
            fixed,
            selected,
            unresolved,
            meat_catalog,
            fiber_boosters,
        })
    }

    /// Formulate a recipe from the requested ingredient names
    ///
    /// # Errors
    ///
    /// Returns an error only when the catalog is unavailable; nutritional
    /// problems are reported in the result's `issues`
    pub async fn calculate<S: AsRef<str> + Sync>(&self, names: &[S]) -> AppResult<FormulationReport> {
        let started = Instant::now();
        let snapshot = self.build_snapshot(names).await?;
        let report = formulate(&snapshot, &self.config).report();

        AppLogger::log_formulation(
            names.len(),
            report.unresolved.len(),
            report.issues.len(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        if !report.unresolved.is_empty() {
            debug!(unresolved = ?report.unresolved, "Requested ingredients not found in catalog");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use kibble_core::models::{CandidateIngredient, FixedIngredient, NutrientProfile};

    fn profile(protein: f64, fat: f64) -> NutrientProfile {
        NutrientProfile {
            protein_g: protein,
            fat_g: fat,
            ..NutrientProfile::default()
        }
    }

    fn service() -> FormulationService {
        let catalog = InMemoryCatalog::new()
            .with_ingredient(CandidateIngredient::new("Chicken Liver", FoodGroup::Organ, profile(60.0, 15.0)))
            .with_ingredient(CandidateIngredient::new("Beef Chuck", FoodGroup::MeatB, profile(45.0, 40.0)))
            .with_ingredient(CandidateIngredient::new("Turkey Breast", FoodGroup::MeatA, profile(80.0, 5.0)))
            .with_ingredient(CandidateIngredient::new("Psyllium Husk", FoodGroup::Unclassified, profile(2.0, 1.0)))
            .with_fixed(FixedIngredient::new("Calcium Carbonate", 10.0, NutrientProfile::default()));
        let catalog: Arc<dyn IngredientCatalog> = Arc::new(catalog);
        FormulationService::new(catalog, FormulationConfig::default())
    }

    #[tokio::test]
    async fn test_snapshot_dedupes_and_tracks_unresolved() {
        let snapshot = service()
            .build_snapshot(&["Chicken Liver", "Chicken Liver", " Chicken Liver", "Dragon Fruit", "Beef Chuck"])
            .await
            .unwrap();

        let names: Vec<_> = snapshot.selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Chicken Liver", "Beef Chuck"]);
        assert_eq!(
            snapshot.unresolved,
            vec![" Chicken Liver".to_owned(), "Dragon Fruit".to_owned()]
        );
        assert_eq!(snapshot.meat_catalog.len(), 2);
        assert_eq!(snapshot.fiber_boosters.len(), 1);
        assert_eq!(snapshot.fixed.len(), 1);
    }

    #[tokio::test]
    async fn test_calculate_reports_fixed_base_and_unresolved() {
        let report = service().calculate(&["Chicken Liver", "Unknown"]).await.unwrap();

        assert!(report.dm_breakdown.iter().any(|e| e.fixed && e.ingredient == "Calcium Carbonate"));
        assert_eq!(report.unresolved, vec!["Unknown".to_owned()]);
        assert!(report
            .issues
            .iter()
            .any(|i| i == kibble_core::constants::issues::NO_MEAT_SELECTED));
    }
}
