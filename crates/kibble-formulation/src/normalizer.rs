// ABOUTME: Total-DM normalizer scaling mutable allocations so the mix lands on target
// ABOUTME: Fixed entries are never touched; small gaps below the threshold are left alone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::ledger::AllocationLedger;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of one normalization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationOutcome {
    /// `target − total` before scaling (g)
    pub scaling_needed_g: f64,
    /// Factor applied to mutable entries, `None` when no scaling ran
    pub factor: Option<f64>,
}

/// Scale mutable entries so the ledger total equals `target`
///
/// Skips scaling when there is no mutable DM or the gap is below `threshold`.
/// A fixed base heavier than the target drives mutable entries to zero rather
/// than negative.
pub fn normalize(ledger: &mut AllocationLedger, target: f64, threshold: f64) -> NormalizationOutcome {
    let scaling_needed_g = target - ledger.total_dm();
    let mutable = ledger.mutable_dm();

    if mutable <= 0.0 || scaling_needed_g.abs() < threshold {
        debug!(scaling_needed_g, mutable, "normalization skipped");
        return NormalizationOutcome {
            scaling_needed_g,
            factor: None,
        };
    }

    let factor = ((mutable + scaling_needed_g) / mutable).max(0.0);
    ledger.scale_mutable(factor);
    debug!(scaling_needed_g, factor, "normalized mutable allocations");
    NormalizationOutcome {
        scaling_needed_g,
        factor: Some(factor),
    }
}

/// Exact rescale of mutable entries to `target`, regardless of gap size
///
/// Returns the factor applied, or `None` when there is no mutable DM.
pub fn rebalance(ledger: &mut AllocationLedger, target: f64) -> Option<f64> {
    let mutable = ledger.mutable_dm();
    if mutable <= 0.0 {
        return None;
    }
    let factor = ((target - ledger.fixed_dm()) / mutable).max(0.0);
    ledger.scale_mutable(factor);
    Some(factor)
}

/// Whether the ledger total is within `threshold` of `target`
#[must_use]
pub fn is_balanced(ledger: &AllocationLedger, target: f64, threshold: f64) -> bool {
    (target - ledger.total_dm()).abs() < threshold
}
