// ABOUTME: Nutrient feedback adjuster run after normalization: protein pass then fiber pass
// ABOUTME: Shares the DM budget and the balance rule that keeps the ledger on target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient Feedback Adjuster
//!
//! ```text
//! Normalized -> protein check -> { Supplemented | Unchanged }
//!            -> fiber check   -> { Increased | Reduced(<= N attempts) | Unchanged }
//!            -> Final
//! ```
//!
//! No pass is revisited. Residual out-of-band conditions become issues.

/// Fiber band enforcement
pub mod fiber;
/// Protein minimum enforcement
pub mod protein;

pub use fiber::{adjust_fiber, FiberAdjustment};
pub use protein::{adjust_protein, ProteinAdjustment};

use crate::config::FormulationConfig;
use crate::ledger::AllocationLedger;
use crate::normalizer::{is_balanced, rebalance};
use crate::snapshot::CatalogSnapshot;
use kibble_core::constants::issues;
use kibble_core::models::FoodGroup;
use tracing::{debug, warn};

/// DM budget shared by the protein and fiber additions
///
/// Re-derived from the ledger when the feedback phase starts: the slack left
/// once the fixed base and the meat rule are accounted for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmBudget {
    remaining_g: f64,
}

impl DmBudget {
    /// `total − fixed DM − meat DM`, floored at zero
    #[must_use]
    pub fn from_ledger(ledger: &AllocationLedger, total_dm_g: f64) -> Self {
        let slack = total_dm_g - ledger.fixed_dm() - ledger.dm_in_groups(&FoodGroup::MEATS);
        Self {
            remaining_g: slack.max(0.0),
        }
    }

    /// Budget with an explicit amount
    #[must_use]
    pub const fn new(remaining_g: f64) -> Self {
        Self { remaining_g }
    }

    /// DM still available (g)
    #[must_use]
    pub const fn remaining_g(&self) -> f64 {
        self.remaining_g
    }

    /// Whether anything is left
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_g <= 0.0
    }

    /// Record an addition
    pub fn spend(&mut self, dm_g: f64) {
        self.remaining_g = (self.remaining_g - dm_g).max(0.0);
    }
}

/// Restore the ledger total after a feedback mutation
///
/// Rescales mutable entries to `target` when the ledger was balanced before the
/// mutation or has overshot the target. Returns whether a rescale ran.
pub fn settle(ledger: &mut AllocationLedger, config: &FormulationConfig, was_balanced: bool) -> bool {
    let target = config.total_dm_g;
    if ledger.mutable_dm() <= 0.0 {
        return false;
    }
    if was_balanced || ledger.total_dm() > target {
        return rebalance(ledger, target).is_some();
    }
    false
}

/// Whether the ledger currently sits on the target total
#[must_use]
pub fn balanced(ledger: &AllocationLedger, config: &FormulationConfig) -> bool {
    is_balanced(ledger, config.total_dm_g, config.rescale_threshold_g)
}

/// Outcome of the whole feedback phase
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    /// Protein pass result
    pub protein: ProteinAdjustment,
    /// Fiber pass result
    pub fiber: FiberAdjustment,
    /// DM budget left unused (g)
    pub budget_left_g: f64,
}

/// Run the protein pass, then the fiber pass, then the protein ceiling check
pub fn run_feedback(
    ledger: &mut AllocationLedger,
    snapshot: &CatalogSnapshot,
    config: &FormulationConfig,
    found: &mut Vec<String>,
) -> FeedbackOutcome {
    let mut budget = DmBudget::from_ledger(ledger, config.total_dm_g);
    debug!(budget = budget.remaining_g(), "feedback phase started");

    let protein = adjust_protein(ledger, snapshot, config, &mut budget);
    let fiber = adjust_fiber(ledger, snapshot, config, &mut budget, found);

    let protein_percent = ledger.totals().protein_percent(config.total_dm_g);
    if protein_percent > config.protein.max_percent {
        warn!(protein_percent, "protein above maximum");
        found.push(issues::protein_remains_high(protein_percent));
    }

    FeedbackOutcome {
        protein,
        fiber,
        budget_left_g: budget.remaining_g(),
    }
}
