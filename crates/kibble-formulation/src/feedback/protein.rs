// ABOUTME: Protein pass adding DM from unused selected meats until the protein minimum holds
// ABOUTME: Candidates ranked by protein density; additions solved in closed form and budget-capped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{balanced, settle, DmBudget};
use crate::allocator::origin_in;
use crate::config::FormulationConfig;
use crate::ledger::AllocationLedger;
use crate::snapshot::CatalogSnapshot;
use kibble_core::models::CandidateIngredient;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tolerance when comparing a percentage against its threshold
const PERCENT_TOLERANCE: f64 = 1e-9;

/// What the protein pass did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProteinAdjustment {
    /// Protein was already at or above the minimum, or nothing could be added
    Unchanged,
    /// DM was added from unused meats
    Supplemented {
        /// `(name, dm_g)` per addition, before any rebalancing
        added: Vec<(String, f64)>,
    },
}

/// Raise protein to the configured minimum using unused selected meats
///
/// Meats are tried in descending protein density. A meat no denser in protein
/// than the current mutable mix is skipped, so protein% never decreases.
pub fn adjust_protein(
    ledger: &mut AllocationLedger,
    snapshot: &CatalogSnapshot,
    config: &FormulationConfig,
    budget: &mut DmBudget,
) -> ProteinAdjustment {
    let target = config.total_dm_g;
    let min_percent = config.protein.min_percent;
    let start = ledger.totals().protein_percent(target);
    if start >= min_percent {
        return ProteinAdjustment::Unchanged;
    }

    let goal_g = min_percent * target / 100.0;
    let mut candidates: Vec<&CandidateIngredient> = snapshot
        .selected
        .iter()
        .filter(|c| c.group.is_meat() && !ledger.contains(&c.name))
        .collect();
    candidates.sort_by(|a, b| b.profile.protein_g.total_cmp(&a.profile.protein_g));
    debug!(start, candidates = candidates.len(), "protein below minimum");

    let mut added = Vec::new();
    for candidate in candidates {
        if budget.is_exhausted() {
            break;
        }
        let density = candidate.profile.protein_g / 100.0;
        if density <= 0.0 {
            continue;
        }

        let was_balanced = balanced(ledger, config);
        let dm = if was_balanced {
            balanced_addition(ledger, goal_g, density, budget.remaining_g())
        } else {
            let room = (target - ledger.total_dm()).max(0.0);
            let needed = (goal_g - ledger.totals().protein_g) / density;
            Some(needed.min(budget.remaining_g()).min(room))
        };
        let Some(dm) = dm.filter(|&dm| dm > 0.0) else {
            continue;
        };

        ledger.assign(candidate, dm, origin_in(snapshot, candidate));
        budget.spend(dm);
        settle(ledger, config, was_balanced);
        added.push((candidate.name.clone(), dm));

        let now = ledger.totals().protein_percent(target);
        debug!(ingredient = %candidate.name, dm, protein_percent = now, "protein supplement");
        if now >= min_percent - PERCENT_TOLERANCE {
            break;
        }
    }

    if added.is_empty() {
        ProteinAdjustment::Unchanged
    } else {
        ProteinAdjustment::Supplemented { added }
    }
}

/// DM to add so that, after rescaling the mutable share back, protein hits `goal_g`
///
/// With mutable DM `r`, mutable protein `p_m` and fixed protein `p_f`, adding `x`
/// grams at density `d` and rescaling gives mutable protein
/// `(p_m + d·x)·r/(r + x)`; solving for `goal_g − p_f` yields `x`. Returns `None`
/// when the candidate would dilute protein.
fn balanced_addition(ledger: &AllocationLedger, goal_g: f64, density: f64, cap: f64) -> Option<f64> {
    let mutable_dm = ledger.mutable_dm();
    if mutable_dm <= 0.0 {
        return None;
    }
    let mutable_protein = ledger.mutable_totals().protein_g;
    if density <= mutable_protein / mutable_dm {
        return None;
    }

    let fixed_protein = ledger.totals().protein_g - mutable_protein;
    let need = goal_g - fixed_protein;
    let ceiling = mutable_dm * density;
    if ceiling <= need {
        return Some(cap);
    }
    let dm = mutable_dm * (need - mutable_protein) / (ceiling - need);
    Some(dm.min(cap))
}
