// ABOUTME: Core data models for the Kibble formulation platform
// ABOUTME: Re-exports ingredient, food group, and nutrient profile definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Ingredient and nutrient profile models
pub mod nutrition;

pub use nutrition::{CandidateIngredient, FixedIngredient, FoodGroup, NutrientProfile};
