// ABOUTME: Application constants organized by domain
// ABOUTME: Issue messages and keyword vocabularies shared by the engine and server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Human-readable issue strings reported alongside a formulation
pub mod issues {
    /// No liver-named organ ingredient was selected
    pub const LIVER_REQUIRED: &str = "Liver is required (10% of DM).";

    /// No meat-group ingredient was selected
    pub const NO_MEAT_SELECTED: &str = "No meat selected.";

    /// A fiber reduction attempt did not move fiber% by more than the plateau epsilon
    #[must_use]
    pub fn fiber_reduction_not_effective(attempt: u32, fiber_percent: f64) -> String {
        format!(
            "Fiber reduction not effective after attempt {attempt}. Current: {fiber_percent:.2}%"
        )
    }

    /// Fiber is still above the maximum after the bounded reduction loop
    #[must_use]
    pub fn fiber_remains_high(fiber_percent: f64, attempts: u32) -> String {
        format!("Fiber remains high ({fiber_percent:.2}%) after {attempts} attempts to reduce it.")
    }

    /// Fiber sits above the maximum but not high enough to trigger the reduction pass
    #[must_use]
    pub fn fiber_above_maximum(fiber_percent: f64) -> String {
        format!("Fiber above maximum ({fiber_percent:.2}%) but below the reduction trigger.")
    }

    /// Fiber is still below the minimum after vegetables and boosters
    #[must_use]
    pub fn fiber_remains_low(fiber_percent: f64) -> String {
        format!("Fiber remains low ({fiber_percent:.2}%) after vegetable and booster adjustments.")
    }

    /// Protein is still above the maximum after the feedback phase
    #[must_use]
    pub fn protein_remains_high(protein_percent: f64) -> String {
        format!("Protein remains high ({protein_percent:.2}%).")
    }
}

/// Keyword vocabularies matched by substring against lowercase ingredient names
pub mod keywords {
    /// Name fragment identifying a liver among organ ingredients
    pub const LIVER: &str = "liver";

    /// Animal vocabulary used to pair fatty meats with lean fallbacks
    pub const ANIMALS: [&str; 10] = [
        "beef", "chicken", "pork", "duck", "turkey", "rabbit", "fish", "quail", "shrimp", "salmon",
    ];

    /// Vegetables whose DM the fiber pass scales up or down
    pub const FIBER_VEGETABLES: [&str; 5] = ["carrot", "spinach", "broccoli", "pumpkin", "zucchini"];

    /// Catalog names (lowercase) of the designated fiber boosters
    pub const FIBER_BOOSTERS: [&str; 2] = ["psyllium husk", "rice bran"];
}

/// Service identity used in logs and health responses
pub mod service {
    /// Default service name
    pub const SERVICE_NAME: &str = "kibble-server";
}
