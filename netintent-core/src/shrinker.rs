use tracing::{debug, trace};

use crate::config::EXACT_HITTING_SET_MCS_LIMIT;
use crate::hitting_set::minimal_hitting_sets;
use crate::intent::IntentIndex;
use crate::oracle::{Oracle, Subset, Verdict};

/// Alternative split ratios tried when a midpoint split leaves both halves SAT.
const ALT_SPLIT_RATIOS: [f64; 4] = [0.3, 0.7, 0.25, 0.75];

fn unsat(v: &Verdict) -> bool {
    !v.is_sat()
}

/// Divide-and-conquer MUS extraction over one UNSAT seed, optionally augmented by
/// MSS-feedback hitting-set mining against the driver's known MSSes.
pub struct Shrinker<'o, 'ctx> {
    oracle: &'o Oracle<'ctx>,
}

impl<'o, 'ctx> Shrinker<'o, 'ctx> {
    pub fn new(oracle: &'o Oracle<'ctx>) -> Self {
        Self { oracle }
    }

    /// Every MUS the recursion and the hitting-set miner can find inside `seed`.
    pub fn find_all_muses(&self, seed: &Subset, known_msses: &[Subset]) -> Vec<Subset> {
        let mut found: Vec<Subset> = Vec::new();
        let ordered: Vec<IntentIndex> = seed.iter().copied().collect();
        self.divide_conquer(&ordered, &mut found);
        self.mine_mss_feedback(seed, known_msses, &mut found);
        dedup_minimal(found)
    }

    fn is_minimal_unsat(&self, candidates: &[IntentIndex]) -> bool {
        candidates.iter().all(|&c| {
            let without: Subset = candidates.iter().copied().filter(|&x| x != c).collect();
            self.oracle.check(&without).is_sat()
        })
    }

    fn divide_conquer(&self, candidates: &[IntentIndex], found: &mut Vec<Subset>) {
        let whole: Subset = candidates.iter().copied().collect();
        if self.oracle.check(&whole).is_sat() {
            return;
        }
        if candidates.len() <= 1 {
            trace!(size = candidates.len(), "divide_conquer found a singleton MUS");
            found.push(whole);
            return;
        }
        if self.is_minimal_unsat(candidates) {
            trace!(size = candidates.len(), "divide_conquer found a MUS directly");
            found.push(whole);
            return;
        }

        let mid = candidates.len() / 2;
        let (left, right) = candidates.split_at(mid);
        let left_verdict = self.oracle.check(&left.iter().copied().collect());
        let right_verdict = self.oracle.check(&right.iter().copied().collect());

        if left_verdict.is_sat() && right_verdict.is_sat() {
            self.split_with_alt_ratios(candidates, found);
            return;
        }

        if unsat(&left_verdict) {
            self.divide_conquer(left, found);
        }
        if unsat(&right_verdict) {
            self.divide_conquer(right, found);
        }

        let covered: Subset = found
            .iter()
            .filter(|m| m.iter().all(|c| candidates.contains(c)))
            .flatten()
            .copied()
            .collect();
        let remainder: Vec<IntentIndex> = candidates.iter().copied().filter(|c| !covered.contains(c)).collect();
        if remainder.len() < candidates.len() && remainder.len() > 1 {
            let remainder_set: Subset = remainder.iter().copied().collect();
            if unsat(&self.oracle.check(&remainder_set)) {
                self.divide_conquer(&remainder, found);
            }
        }
    }

    fn split_with_alt_ratios(&self, candidates: &[IntentIndex], found: &mut Vec<Subset>) {
        for &ratio in &ALT_SPLIT_RATIOS {
            let mid = ((candidates.len() as f64) * ratio).round() as usize;
            let mid = mid.clamp(1, candidates.len() - 1);
            let (left, right) = candidates.split_at(mid);
            let left_unsat = unsat(&self.oracle.check(&left.iter().copied().collect()));
            let right_unsat = unsat(&self.oracle.check(&right.iter().copied().collect()));
            if left_unsat || right_unsat {
                if left_unsat {
                    self.divide_conquer(left, found);
                }
                if right_unsat {
                    self.divide_conquer(right, found);
                }
                return;
            }
        }
        self.linear_shrink(candidates, found);
    }

    /// Fallback when no split ratio isolates an UNSAT side: drop elements one at a
    /// time, keeping the set UNSAT, until no further element can be removed.
    fn linear_shrink(&self, candidates: &[IntentIndex], found: &mut Vec<Subset>) {
        let mut residual: Vec<IntentIndex> = candidates.to_vec();
        let mut i = 0;
        while i < residual.len() {
            let without: Vec<IntentIndex> = residual.iter().copied().filter(|&x| x != residual[i]).collect();
            let without_set: Subset = without.iter().copied().collect();
            if unsat(&self.oracle.check(&without_set)) {
                residual = without;
            } else {
                i += 1;
            }
        }
        let mus: Subset = residual.into_iter().collect();
        if unsat(&self.oracle.check(&mus)) && !found.contains(&mus) {
            debug!(size = mus.len(), "linear shrink fallback produced a MUS");
            found.push(mus);
        }
    }

    /// MUSes as minimal hitting sets of the MCS complements of known MSSes,
    /// restricted to `seed`.
    fn mine_mss_feedback(&self, seed: &Subset, known_msses: &[Subset], found: &mut Vec<Subset>) {
        let mcses: Vec<Subset> = known_msses
            .iter()
            .map(|mss| seed.difference(mss).copied().collect::<Subset>())
            .filter(|mcs| !mcs.is_empty())
            .collect();
        if mcses.is_empty() {
            return;
        }
        let exact = mcses.len() <= EXACT_HITTING_SET_MCS_LIMIT.get();
        let candidates = minimal_hitting_sets(&mcses, exact);
        for candidate in candidates {
            if found.iter().any(|m| m.is_subset(&candidate)) {
                continue;
            }
            if unsat(&self.oracle.check(&candidate)) && self.is_minimal_unsat(&candidate.iter().copied().collect::<Vec<_>>()) {
                debug!(size = candidate.len(), "MSS-feedback mining produced a MUS");
                found.push(candidate);
            }
        }
    }
}

fn dedup_minimal(found: Vec<Subset>) -> Vec<Subset> {
    let mut result: Vec<Subset> = Vec::new();
    for candidate in found {
        if result.iter().any(|existing: &Subset| existing == &candidate) {
            continue;
        }
        if result.iter().any(|existing: &Subset| existing.is_subset(&candidate) || existing.is_superset(&candidate)) {
            continue;
        }
        result.push(candidate);
    }
    result
}
