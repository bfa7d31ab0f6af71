// ABOUTME: Formulation pipeline: fixed base, group allocation, normalization, feedback, totals
// ABOUTME: Stateless per call; every structure is built from the snapshot and dropped afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::allocator::{AllocationSummary, GroupAllocator};
use crate::config::FormulationConfig;
use crate::feedback::{run_feedback, FiberAdjustment, ProteinAdjustment};
use crate::ledger::AllocationLedger;
use crate::normalizer::{normalize, NormalizationOutcome};
use crate::report::FormulationReport;
use crate::snapshot::CatalogSnapshot;
use crate::totals::AggregateTotals;
use tracing::{debug, info};

/// Full result of one formulation run
#[derive(Debug, Clone)]
pub struct Formulation {
    /// Final ledger
    pub ledger: AllocationLedger,
    /// Issues in discovery order
    pub issues: Vec<String>,
    /// DM per quota rule
    pub allocation: AllocationSummary,
    /// Normalizer outcome
    pub normalization: NormalizationOutcome,
    /// Protein pass outcome
    pub protein: ProteinAdjustment,
    /// Fiber pass outcome
    pub fiber: FiberAdjustment,
    /// Requested names missing from the catalog
    pub unresolved: Vec<String>,
    /// DM target the run aimed for (g)
    pub total_dm_g: f64,
}

impl Formulation {
    /// Aggregate totals of the final ledger
    #[must_use]
    pub fn totals(&self) -> AggregateTotals {
        self.ledger.totals()
    }

    /// Presentation report
    #[must_use]
    pub fn report(&self) -> FormulationReport {
        FormulationReport::build(
            &self.ledger,
            self.total_dm_g,
            self.issues.clone(),
            self.unresolved.clone(),
        )
    }
}

/// Run the whole pipeline over one request's snapshot
///
/// Never fails on nutritional grounds: missing liver or meat and out-of-band
/// fiber or protein are reported in `issues`.
#[must_use]
pub fn formulate(snapshot: &CatalogSnapshot, config: &FormulationConfig) -> Formulation {
    let mut ledger = AllocationLedger::seed(&snapshot.fixed);
    let mut issues = Vec::new();

    let allocation = GroupAllocator::new(snapshot, config).allocate(&mut ledger, &mut issues);
    let normalization = normalize(&mut ledger, config.total_dm_g, config.rescale_threshold_g);
    let feedback = run_feedback(&mut ledger, snapshot, config, &mut issues);

    debug!(
        budget_left_g = feedback.budget_left_g,
        total_dm = ledger.total_dm(),
        "feedback phase complete"
    );
    info!(
        entries = ledger.len(),
        issues = issues.len(),
        meat_policy = ?allocation.meat_policy,
        "formulation complete"
    );

    Formulation {
        ledger,
        issues,
        allocation,
        normalization,
        protein: feedback.protein,
        fiber: feedback.fiber,
        unresolved: snapshot.unresolved.clone(),
        total_dm_g: config.total_dm_g,
    }
}
