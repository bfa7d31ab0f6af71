// ABOUTME: Nutrition models for dog-food formulation
// ABOUTME: NutrientProfile, FoodGroup, CandidateIngredient, and FixedIngredient definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nutrient content per 100 g of dry matter
///
/// Immutable once loaded from the catalog. Calcium, phosphorus and iron are
/// stored in the catalog's native milligram units. Missing fields deserialize
/// as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    /// Protein (g / 100 g DM)
    pub protein_g: f64,
    /// Fat (g / 100 g DM)
    pub fat_g: f64,
    /// Carbohydrate (g / 100 g DM)
    pub cho_g: f64,
    /// Crude fiber (g / 100 g DM)
    pub fiber_g: f64,
    /// Ash (g / 100 g DM)
    pub ash_g: f64,
    /// Calcium (mg / 100 g DM)
    pub calcium_mg: f64,
    /// Phosphorus (mg / 100 g DM)
    pub phosphorus_mg: f64,
    /// Iron (mg / 100 g DM)
    pub iron_mg: f64,
    /// Metabolizable energy (kcal / 100 g DM)
    pub energy_kcal: f64,
}

impl NutrientProfile {
    /// Build a profile from the nine catalog columns in storage order
    #[must_use]
    pub const fn from_array(values: [f64; 9]) -> Self {
        Self {
            protein_g: values[0],
            fat_g: values[1],
            cho_g: values[2],
            fiber_g: values[3],
            ash_g: values[4],
            calcium_mg: values[5],
            phosphorus_mg: values[6],
            iron_mg: values[7],
            energy_kcal: values[8],
        }
    }

    /// The nine fields in storage order
    #[must_use]
    pub const fn to_array(&self) -> [f64; 9] {
        [
            self.protein_g,
            self.fat_g,
            self.cho_g,
            self.fiber_g,
            self.ash_g,
            self.calcium_mg,
            self.phosphorus_mg,
            self.iron_mg,
            self.energy_kcal,
        ]
    }
}

/// Food-group tag governing which quota rule applies to an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    /// Organ meat (liver, heart, kidney, ...)
    Organ,
    /// Vegetable tier A
    VegetableA,
    /// Vegetable tier B
    VegetableB,
    /// Vegetable tier C
    VegetableC,
    /// Fruit
    Fruit,
    /// Oils and fats
    Oil,
    /// Grain tier A
    GrainA,
    /// Grain tier B
    GrainB,
    /// Meat group A
    MeatA,
    /// Meat group B
    MeatB,
    /// Meat group C
    MeatC,
    /// Any tag outside the quota rules (supplements, fiber boosters)
    Unclassified,
}

impl FoodGroup {
    /// Every group, in quota-rule order
    pub const ALL: [Self; 12] = [
        Self::Organ,
        Self::VegetableA,
        Self::VegetableB,
        Self::VegetableC,
        Self::Fruit,
        Self::Oil,
        Self::GrainA,
        Self::GrainB,
        Self::MeatA,
        Self::MeatB,
        Self::MeatC,
        Self::Unclassified,
    ];

    /// The three meat groups
    pub const MEATS: [Self; 3] = [Self::MeatA, Self::MeatB, Self::MeatC];

    /// Parse a catalog group tag
    ///
    /// Tags are trimmed, lowercased and have inner whitespace collapsed before
    /// matching. Organ, fruit and oil match by substring; tiered groups match
    /// exactly. Unknown tags map to `Unclassified`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let normalized = tag
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "vegetable a" => Self::VegetableA,
            "vegetable b" => Self::VegetableB,
            "vegetable c" => Self::VegetableC,
            "grain a" => Self::GrainA,
            "grain b" => Self::GrainB,
            "meat group a" | "meat a" => Self::MeatA,
            "meat group b" | "meat b" => Self::MeatB,
            "meat group c" | "meat c" => Self::MeatC,
            other if other.contains("organ") => Self::Organ,
            other if other.contains("fruit") => Self::Fruit,
            other if other.contains("oil") => Self::Oil,
            _ => Self::Unclassified,
        }
    }

    /// Canonical storage tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organ => "organ",
            Self::VegetableA => "vegetable a",
            Self::VegetableB => "vegetable b",
            Self::VegetableC => "vegetable c",
            Self::Fruit => "fruit",
            Self::Oil => "oil",
            Self::GrainA => "grain a",
            Self::GrainB => "grain b",
            Self::MeatA => "meat group a",
            Self::MeatB => "meat group b",
            Self::MeatC => "meat group c",
            Self::Unclassified => "unclassified",
        }
    }

    /// Whether this is one of the three meat groups
    #[must_use]
    pub const fn is_meat(self) -> bool {
        matches!(self, Self::MeatA | Self::MeatB | Self::MeatC)
    }
}

impl fmt::Display for FoodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingredient the caller may select, resolved from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIngredient {
    /// Ingredient name, unique within a request
    pub name: String,
    /// Food group governing its quota rule
    pub group: FoodGroup,
    /// Nutrients per 100 g DM
    pub profile: NutrientProfile,
}

impl CandidateIngredient {
    /// Create a candidate ingredient
    pub fn new(name: impl Into<String>, group: FoodGroup, profile: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            group,
            profile,
        }
    }
}

/// An ingredient of the immutable base recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedIngredient {
    /// Ingredient name
    pub name: String,
    /// Authoritative dry-matter amount (g)
    pub dm_g: f64,
    /// Nutrients per 100 g DM
    pub profile: NutrientProfile,
}

impl FixedIngredient {
    /// Create a fixed ingredient
    pub fn new(name: impl Into<String>, dm_g: f64, profile: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            dm_g,
            profile,
        }
    }
}
