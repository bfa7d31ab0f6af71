// ABOUTME: SQLite ingredient catalog backing the formulation service
// ABOUTME: Schema migration, seeding upserts, and the IngredientCatalog lookups over sqlx
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Catalog Database
//!
//! Two tables: `user_ingredients` (the selectable catalog, keyed by name, with a
//! free-form group tag) and `fixed_ingredients` (the fixed base with its DM,
//! ordered by `position`). Nutrient columns are per 100 g DM.

/// JSON fixture loading for seeding
pub mod fixture;

pub use fixture::{CatalogFixture, SeedSummary};

use crate::catalog::{order_by_names, CatalogListing, IngredientCatalog};
use crate::config::DatabaseUrl;
use crate::logging::AppLogger;
use async_trait::async_trait;
use kibble_core::errors::{AppError, AppResult};
use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup, NutrientProfile};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::time::Instant;
use tracing::{debug, info};

/// Nutrient columns in storage order
const NUTRIENT_COLUMNS: [&str; 9] = [
    "protein_g",
    "fat_g",
    "cho_g",
    "fiber_g",
    "ash_g",
    "calcium_mg",
    "phosphorus_mg",
    "iron_mg",
    "energy_kcal",
];

/// SQLite-backed ingredient catalog
#[derive(Clone)]
pub struct CatalogDatabase {
    pool: SqlitePool,
}

impl CatalogDatabase {
    /// Connect to the catalog database
    ///
    /// File databases are created if missing. In-memory databases use a single
    /// long-lived connection so every query sees the same schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// connection fails
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match url {
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(&url.to_connection_string())
                .await,
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                SqlitePool::connect(&format!("{}?mode=rwc", url.to_connection_string())).await
            }
        }
        .map_err(|e| AppError::from(e).with_context(format!("Failed to connect to {url}")))?;

        info!(database = %url, "Catalog database connected");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create catalog tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_ingredients (
                ingredient_name TEXT PRIMARY KEY,
                group_name TEXT NOT NULL,
                protein_g REAL NOT NULL DEFAULT 0,
                fat_g REAL NOT NULL DEFAULT 0,
                cho_g REAL NOT NULL DEFAULT 0,
                fiber_g REAL NOT NULL DEFAULT 0,
                ash_g REAL NOT NULL DEFAULT 0,
                calcium_mg REAL NOT NULL DEFAULT 0,
                phosphorus_mg REAL NOT NULL DEFAULT 0,
                iron_mg REAL NOT NULL DEFAULT 0,
                energy_kcal REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).with_context("Failed to create user_ingredients"))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS fixed_ingredients (
                ingredient_name TEXT PRIMARY KEY,
                dm_g REAL NOT NULL,
                protein_g REAL NOT NULL DEFAULT 0,
                fat_g REAL NOT NULL DEFAULT 0,
                cho_g REAL NOT NULL DEFAULT 0,
                fiber_g REAL NOT NULL DEFAULT 0,
                ash_g REAL NOT NULL DEFAULT 0,
                calcium_mg REAL NOT NULL DEFAULT 0,
                phosphorus_mg REAL NOT NULL DEFAULT 0,
                iron_mg REAL NOT NULL DEFAULT 0,
                energy_kcal REAL NOT NULL DEFAULT 0,
                position INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).with_context("Failed to create fixed_ingredients"))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_ingredients_lower_name ON user_ingredients(LOWER(ingredient_name))",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).with_context("Failed to create ingredient index"))?;

        debug!("Catalog schema migrated");
        Ok(())
    }

    /// Insert or replace a catalog ingredient
    ///
    /// `group_name` is stored verbatim so unrecognized tags survive a round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub async fn upsert_ingredient(
        &self,
        name: &str,
        group_name: &str,
        profile: &NutrientProfile,
    ) -> AppResult<()> {
        let mut query = sqlx::query(
            r"
            INSERT INTO user_ingredients (
                ingredient_name, group_name, protein_g, fat_g, cho_g, fiber_g, ash_g,
                calcium_mg, phosphorus_mg, iron_mg, energy_kcal
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT(ingredient_name) DO UPDATE SET
                group_name = excluded.group_name,
                protein_g = excluded.protein_g,
                fat_g = excluded.fat_g,
                cho_g = excluded.cho_g,
                fiber_g = excluded.fiber_g,
                ash_g = excluded.ash_g,
                calcium_mg = excluded.calcium_mg,
                phosphorus_mg = excluded.phosphorus_mg,
                iron_mg = excluded.iron_mg,
                energy_kcal = excluded.energy_kcal
            ",
        )
        .bind(name)
        .bind(group_name);
        for value in profile.to_array() {
            query = query.bind(value);
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from(e).with_context(format!("Failed to upsert ingredient {name}")))?;
        Ok(())
    }

    /// Insert or replace a fixed-base ingredient at `position`
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub async fn upsert_fixed_ingredient(&self, fixed: &FixedIngredient, position: i64) -> AppResult<()> {
        let mut query = sqlx::query(
            r"
            INSERT INTO fixed_ingredients (
                ingredient_name, dm_g, protein_g, fat_g, cho_g, fiber_g, ash_g,
                calcium_mg, phosphorus_mg, iron_mg, energy_kcal, position
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT(ingredient_name) DO UPDATE SET
                dm_g = excluded.dm_g,
                protein_g = excluded.protein_g,
                fat_g = excluded.fat_g,
                cho_g = excluded.cho_g,
                fiber_g = excluded.fiber_g,
                ash_g = excluded.ash_g,
                calcium_mg = excluded.calcium_mg,
                phosphorus_mg = excluded.phosphorus_mg,
                iron_mg = excluded.iron_mg,
                energy_kcal = excluded.energy_kcal,
                position = excluded.position
            ",
        )
        .bind(&fixed.name)
        .bind(fixed.dm_g);
        for value in fixed.profile.to_array() {
            query = query.bind(value);
        }
        query
            .bind(position)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from(e).with_context(format!("Failed to upsert fixed ingredient {}", fixed.name))
            })?;
        Ok(())
    }

    async fn fetch_all_ingredients(&self) -> AppResult<Vec<CandidateIngredient>> {
        let started = Instant::now();
        let result = sqlx::query(&select_ingredients(""))
            .fetch_all(&self.pool)
            .await;
        AppLogger::log_database_operation(
            "select",
            "user_ingredients",
            result.is_ok(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        let rows =
            result.map_err(|e| AppError::from(e).with_context("Failed to list ingredients"))?;
        Ok(rows.iter().map(row_to_candidate).collect())
    }
}

fn select_ingredients(filter: &str) -> String {
    format!(
        "SELECT ingredient_name, group_name, {} FROM user_ingredients {filter} ORDER BY rowid",
        NUTRIENT_COLUMNS.join(", ")
    )
}

fn row_to_profile(row: &SqliteRow) -> NutrientProfile {
    let mut values = [0.0; 9];
    for (value, column) in values.iter_mut().zip(NUTRIENT_COLUMNS) {
        *value = row.get(column);
    }
    NutrientProfile::from_array(values)
}

fn row_to_candidate(row: &SqliteRow) -> CandidateIngredient {
    let name: String = row.get("ingredient_name");
    let group_name: String = row.get("group_name");
    CandidateIngredient::new(name, FoodGroup::parse(&group_name), row_to_profile(row))
}

fn row_to_fixed(row: &SqliteRow) -> FixedIngredient {
    let name: String = row.get("ingredient_name");
    let dm_g: f64 = row.get("dm_g");
    FixedIngredient::new(name, dm_g, row_to_profile(row))
}

#[async_trait]
impl IngredientCatalog for CatalogDatabase {
    async fn list_ingredients(&self) -> AppResult<Vec<CatalogListing>> {
        let rows = sqlx::query("SELECT ingredient_name, group_name FROM user_ingredients ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::from(e).with_context("Failed to list ingredients"))?;

        Ok(rows
            .iter()
            .map(|row| CatalogListing {
                ingredient_name: row.get("ingredient_name"),
                group_name: row.get("group_name"),
            })
            .collect())
    }

    async fn lookup_by_name(&self, name: &str) -> AppResult<Option<CandidateIngredient>> {
        let row = sqlx::query(&select_ingredients("WHERE ingredient_name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from(e).with_context(format!("Failed to look up ingredient {name}")))?;

        Ok(row.as_ref().map(row_to_candidate))
    }

    async fn lookup_by_group(&self, group: FoodGroup) -> AppResult<Vec<CandidateIngredient>> {
        self.lookup_by_groups(&[group]).await
    }

    async fn lookup_by_groups(&self, groups: &[FoodGroup]) -> AppResult<Vec<CandidateIngredient>> {
        // Tags are free-form, so matching goes through FoodGroup::parse
        Ok(self
            .fetch_all_ingredients()
            .await?
            .into_iter()
            .filter(|c| groups.contains(&c.group))
            .collect())
    }

    async fn lookup_by_names(&self, names: &[String]) -> AppResult<Vec<CandidateIngredient>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (1..=names.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = select_ingredients(&format!("WHERE LOWER(ingredient_name) IN ({placeholders})"));

        let mut query = sqlx::query(&sql);
        for name in names {
            query = query.bind(name.to_lowercase());
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::from(e).with_context("Failed to look up ingredients by name"))?;

        Ok(order_by_names(names, rows.iter().map(row_to_candidate).collect()))
    }

    async fn load_fixed_ingredients(&self) -> AppResult<Vec<FixedIngredient>> {
        let sql = format!(
            "SELECT ingredient_name, dm_g, {} FROM fixed_ingredients ORDER BY position, rowid",
            NUTRIENT_COLUMNS.join(", ")
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::from(e).with_context("Failed to load fixed ingredients"))?;

        Ok(rows.iter().map(row_to_fixed).collect())
    }
}
