// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, ingredient builders and seeded catalogs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `kibble_server`

use anyhow::Result;
use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup, NutrientProfile};
use kibble_server::config::DatabaseUrl;
use kibble_server::database::{CatalogDatabase, CatalogFixture};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Profile from the nine catalog columns:
/// protein, fat, cho, fiber, ash, calcium mg, phosphorus mg, iron mg, kcal
pub fn profile(values: [f64; 9]) -> NutrientProfile {
    NutrientProfile::from_array(values)
}

/// Candidate with only protein, fat and fiber set
pub fn ingredient(name: &str, group: FoodGroup, protein: f64, fat: f64, fiber: f64) -> CandidateIngredient {
    CandidateIngredient::new(
        name,
        group,
        NutrientProfile {
            protein_g: protein,
            fat_g: fat,
            fiber_g: fiber,
            ..NutrientProfile::default()
        },
    )
}

/// Mineral premix used as the fixed base in most tests
pub fn mineral_premix(dm_g: f64) -> FixedIngredient {
    FixedIngredient::new(
        "Mineral Premix",
        dm_g,
        profile([0.0, 0.0, 0.0, 0.0, 90.0, 20000.0, 8000.0, 200.0, 0.0]),
    )
}

/// Path of the bundled demo catalog fixture
pub fn demo_fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/demo_catalog.json")
}

/// In-memory SQLite catalog, migrated and seeded with the demo fixture
pub async fn seeded_database() -> Result<CatalogDatabase> {
    init_test_logging();
    let database = CatalogDatabase::connect(&DatabaseUrl::Memory).await?;
    database.migrate().await?;
    let fixture = CatalogFixture::load(&demo_fixture_path()).await?;
    fixture.seed(&database).await?;
    Ok(database)
}
