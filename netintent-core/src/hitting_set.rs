use std::collections::BTreeSet;

use crate::intent::IntentIndex;

pub type Set = BTreeSet<IntentIndex>;

/// Minimal hitting sets of `sets` (each the complement of a known MSS, i.e. an MCS).
/// Exact enumeration for small collections; a single greedy most-uncovered-first
/// candidate otherwise, mirroring the exact/heuristic split used for MSS-feedback
/// mining (C6).
pub fn minimal_hitting_sets(sets: &[Set], exact: bool) -> Vec<Set> {
    if sets.is_empty() {
        return Vec::new();
    }
    if exact {
        exact_minimal_hitting_sets(sets)
    } else {
        vec![greedy_hitting_set(sets)]
    }
}

fn exact_minimal_hitting_sets(sets: &[Set]) -> Vec<Set> {
    let mut candidates: Vec<Set> = Vec::new();
    enumerate(sets, Set::new(), &mut candidates);

    let mut minimal: Vec<Set> = Vec::new();
    for s in candidates {
        if minimal.iter().any(|m: &Set| m.is_subset(&s)) {
            continue;
        }
        minimal.retain(|m| !s.is_subset(m));
        minimal.push(s);
    }
    minimal
}

fn enumerate(sets: &[Set], current: Set, out: &mut Vec<Set>) {
    match sets.iter().find(|s| current.is_disjoint(s)) {
        Some(uncovered) => {
            for &elem in uncovered {
                let mut next = current.clone();
                next.insert(elem);
                enumerate(sets, next, out);
            }
        }
        None => out.push(current),
    }
}

fn greedy_hitting_set(sets: &[Set]) -> Set {
    let mut remaining: Vec<Set> = sets.to_vec();
    let mut hitting = Set::new();
    while !remaining.is_empty() {
        let mut counts: std::collections::BTreeMap<IntentIndex, usize> = std::collections::BTreeMap::new();
        for s in &remaining {
            for &elem in s {
                *counts.entry(elem).or_insert(0) += 1;
            }
        }
        let best = *counts.iter().max_by_key(|(_, &count)| count).map(|(elem, _)| elem).expect("remaining is non-empty");
        hitting.insert(best);
        remaining.retain(|s| !s.contains(&best));
    }
    hitting
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elems: &[IntentIndex]) -> Set {
        elems.iter().copied().collect()
    }

    #[test]
    fn exact_finds_both_minimal_hitting_sets_of_disjoint_pairs() {
        let mcses = vec![set(&[1, 2]), set(&[3, 4])];
        let hitting = minimal_hitting_sets(&mcses, true);
        assert!(hitting.iter().all(|h| h.len() == 2));
        assert!(hitting.contains(&set(&[1, 3])));
        assert!(hitting.contains(&set(&[1, 4])));
        assert!(hitting.contains(&set(&[2, 3])));
        assert!(hitting.contains(&set(&[2, 4])));
    }

    #[test]
    fn exact_drops_non_minimal_hitting_sets() {
        let mcses = vec![set(&[1]), set(&[1, 2])];
        let hitting = minimal_hitting_sets(&mcses, true);
        assert_eq!(hitting, vec![set(&[1])]);
    }

    #[test]
    fn greedy_covers_every_set() {
        let mcses = vec![set(&[1, 2]), set(&[2, 3]), set(&[3, 4])];
        let hitting = greedy_hitting_set(&mcses);
        assert!(mcses.iter().all(|m| !m.is_disjoint(&hitting)));
    }
}
