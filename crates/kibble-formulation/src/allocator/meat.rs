// ABOUTME: Meat policy table keyed by which meat groups are present and their average fat
// ABOUTME: Each policy is a tagged variant applied independently, with catalog fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{distribute_exact, origin_in};
use crate::config::MeatRuleConfig;
use crate::ledger::AllocationLedger;
use crate::snapshot::CatalogSnapshot;
use kibble_core::models::{CandidateIngredient, FoodGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Which row of the meat decision table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeatPolicy {
    /// No meat-group ingredient selected
    NoMeat,
    /// Meat-B average fat above threshold: some B, then lean A of the same animal
    FattyB,
    /// Only meat-A, lean: some A, then top up with the fattiest catalog B/C
    LeanAOnly,
    /// Only meat-A, not lean: A up to the meat maximum
    RichAOnly,
    /// Only meat-C, fatty: some C, then A of the same animal
    FattyCOnly,
    /// Only meat-C, not fatty: C up to the meat maximum
    LeanCOnly,
    /// Any other mix: A, B and C together up to the meat maximum
    Combined,
}

/// Selected meat pools by group
#[derive(Debug, Clone, Copy)]
pub struct MeatPools<'a> {
    /// Selected meat-A
    pub a: &'a [&'a CandidateIngredient],
    /// Selected meat-B
    pub b: &'a [&'a CandidateIngredient],
    /// Selected meat-C
    pub c: &'a [&'a CandidateIngredient],
}

impl MeatPolicy {
    /// Evaluate the decision table; rows are checked top to bottom
    #[must_use]
    pub fn select(pools: MeatPools<'_>, config: &MeatRuleConfig) -> Self {
        let (has_a, has_b, has_c) = (!pools.a.is_empty(), !pools.b.is_empty(), !pools.c.is_empty());

        if !has_a && !has_b && !has_c {
            Self::NoMeat
        } else if average_fat(pools.b) > config.fatty_b_fat_threshold {
            Self::FattyB
        } else if has_a && !has_b && !has_c {
            if average_fat(pools.a) < config.lean_a_fat_threshold {
                Self::LeanAOnly
            } else {
                Self::RichAOnly
            }
        } else if has_c && !has_a && !has_b {
            if average_fat(pools.c) > config.fatty_c_fat_threshold {
                Self::FattyCOnly
            } else {
                Self::LeanCOnly
            }
        } else {
            Self::Combined
        }
    }

    /// Allocate meat DM according to this policy, returning the DM assigned
    pub fn apply(
        self,
        ledger: &mut AllocationLedger,
        pools: MeatPools<'_>,
        snapshot: &CatalogSnapshot,
        config: &MeatRuleConfig,
    ) -> f64 {
        let selected = |c: &CandidateIngredient| origin_in(snapshot, c);

        match self {
            Self::NoMeat => 0.0,
            Self::FattyB => {
                let mut used = distribute_exact(ledger, pools.b, config.fatty_b_alloc_g, selected);
                let fallback = same_animal_fallback(ledger, pools.b, snapshot, config);
                debug!(candidates = fallback.len(), "fatty meat-B fallback pool");
                used += distribute_exact(ledger, &fallback, config.fatty_b_fallback_g, selected);
                used
            }
            Self::LeanAOnly => {
                let mut used = distribute_exact(ledger, pools.a, config.lean_a_alloc_g, selected);
                let shortfall = config.min_g - used;
                if let Some(top_up) = fattiest_unused(ledger, snapshot) {
                    debug!(ingredient = %top_up.name, shortfall, "lean meat-A top-up");
                    used += distribute_exact(ledger, &[top_up], shortfall, selected);
                }
                used
            }
            Self::RichAOnly => distribute_exact(ledger, pools.a, config.max_g, selected),
            Self::FattyCOnly => {
                let mut used = distribute_exact(ledger, pools.c, config.fatty_c_alloc_g, selected);
                let fallback = same_animal_fallback(ledger, pools.c, snapshot, config);
                debug!(candidates = fallback.len(), "fatty meat-C fallback pool");
                used += distribute_exact(ledger, &fallback, config.fatty_c_fallback_g, selected);
                used
            }
            Self::LeanCOnly => distribute_exact(ledger, pools.c, config.max_g, selected),
            Self::Combined => {
                let all: Vec<&CandidateIngredient> = pools
                    .a
                    .iter()
                    .chain(pools.b)
                    .chain(pools.c)
                    .copied()
                    .collect();
                distribute_exact(ledger, &all, config.max_g, selected)
            }
        }
    }
}

/// Arithmetic mean of the fat field, 0 for an empty group
#[must_use]
pub fn average_fat(group: &[&CandidateIngredient]) -> f64 {
    if group.is_empty() {
        return 0.0;
    }
    group.iter().map(|c| c.profile.fat_g).sum::<f64>() / group.len() as f64
}

/// First animal word found in `name`, matched case-insensitively by substring
#[must_use]
pub fn animal_keyword<'k>(name: &str, vocabulary: &'k [String]) -> Option<&'k str> {
    let lower = name.to_lowercase();
    vocabulary
        .iter()
        .map(String::as_str)
        .find(|animal| lower.contains(animal))
}

/// Unused catalog meat-A sharing an animal keyword with `keyed_by`
fn same_animal_fallback<'s>(
    ledger: &AllocationLedger,
    keyed_by: &[&CandidateIngredient],
    snapshot: &'s CatalogSnapshot,
    config: &MeatRuleConfig,
) -> Vec<&'s CandidateIngredient> {
    let animals: HashSet<&str> = keyed_by
        .iter()
        .filter_map(|c| animal_keyword(&c.name, &config.animal_keywords))
        .collect();

    snapshot
        .catalog_meat(FoodGroup::MeatA)
        .into_iter()
        .filter(|c| !ledger.contains(&c.name))
        .filter(|c| {
            animal_keyword(&c.name, &config.animal_keywords).is_some_and(|a| animals.contains(a))
        })
        .collect()
}

/// Highest-fat unused catalog meat-B or meat-C ingredient
fn fattiest_unused<'s>(
    ledger: &AllocationLedger,
    snapshot: &'s CatalogSnapshot,
) -> Option<&'s CandidateIngredient> {
    snapshot
        .meat_catalog
        .iter()
        .filter(|c| matches!(c.group, FoodGroup::MeatB | FoodGroup::MeatC))
        .filter(|c| !ledger.contains(&c.name))
        .reduce(|best, c| if c.profile.fat_g > best.profile.fat_g { c } else { best })
}
