// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Ensemble helpers: weighted complementary-paradigm sampling and
//! order-preserving deduplication.

use std::collections::HashSet;

use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand::distr::Distribution;
use rand::RngCore;
use tracing::warn;

use super::paradigm::Paradigm;

/// Draw up to `count` paradigms without replacement, each draw proportional to
/// the remaining candidates' weights.
pub fn sample_weighted<R: RngCore + ?Sized>(
    candidates: &[(Paradigm, f64)],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Paradigm>, WeightError> {
    let mut pool = candidates.to_vec();
    let mut picked = Vec::with_capacity(count.min(pool.len()));

    while picked.len() < count && !pool.is_empty() {
        let dist = WeightedIndex::<f64>::new(pool.iter().map(|(_, w)| *w))?;
        let (paradigm, _) = pool.remove(dist.sample(rng));
        picked.push(paradigm);
    }

    Ok(picked)
}

/// Weighted sample of complementary paradigms, falling back to the first
/// `count` candidates in the given order when the weights are degenerate.
pub fn select_complementary<R: RngCore + ?Sized>(
    candidates: &[(Paradigm, f64)],
    count: usize,
    rng: &mut R,
) -> Vec<Paradigm> {
    match sample_weighted(candidates, count, rng) {
        Ok(picked) => picked,
        Err(e) => {
            warn!(error = %e, "Weighted paradigm sampling failed, using canonical order");
            candidates.iter().take(count).map(|(p, _)| *p).collect()
        }
    }
}

/// Remove duplicates, keeping the first occurrence of each question.
pub fn dedup_preserving_order(questions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    questions
        .into_iter()
        .filter(|q| seen.insert(q.clone()))
        .collect()
}
