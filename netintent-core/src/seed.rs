use std::collections::BTreeSet;

use tracing::trace;
use varisat::{ExtendFormula, Lit, Solver};

use crate::intent::IntentIndex;
use crate::oracle::Subset;

/// Boolean search space over intent indices, one SAT variable per intent. Produces
/// maximal unexplored subsets ("seeds"), supports up/down blocking, and enforces a
/// cardinality floor that rises as larger MSSes are found.
///
/// The cardinality floor is enforced the way a plain SAT-backed map solver (without
/// a native cardinality encoding) has to: track a threshold, and if a returned model
/// is smaller than it, block that exact assignment and re-solve.
pub struct SeedGenerator {
    n: usize,
    solver: Solver<'static>,
    floor: usize,
}

fn lit(index: IntentIndex, positive: bool) -> Lit {
    let dimacs = index as isize;
    Lit::from_dimacs(if positive { dimacs } else { -dimacs })
}

impl SeedGenerator {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            solver: Solver::new(),
            floor: 0,
        }
    }

    pub fn raise_floor(&mut self, candidate: usize) {
        if candidate > self.floor {
            trace!(old = self.floor, new = candidate, "raising cardinality floor");
            self.floor = candidate;
        }
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    fn model_subset(&mut self) -> Subset {
        self.solver
            .model()
            .expect("solve() must have returned Ok(true) before calling model_subset")
            .into_iter()
            .filter_map(|l| {
                let dimacs = l.to_dimacs();
                (dimacs > 0).then_some(dimacs as IntentIndex)
            })
            .collect()
    }

    /// Grows `seed` to a maximal model of the current clause database: repeatedly
    /// tries to force one more excluded variable true, adopting whatever larger
    /// model results, until no excluded variable can be added.
    fn maximize(&mut self, mut seed: Subset) -> Subset {
        loop {
            let complement: Vec<IntentIndex> = (1..=self.n).filter(|i| !seed.contains(i)).collect();
            let mut grew = false;
            for candidate in complement {
                let mut assumptions: Vec<Lit> = seed.iter().map(|&i| lit(i, true)).collect();
                assumptions.push(lit(candidate, true));
                self.solver.assume(&assumptions);
                if self.solver.solve().expect("varisat solve must not error") {
                    seed = self.model_subset();
                    grew = true;
                    break;
                }
            }
            if !grew {
                return seed;
            }
        }
    }

    /// Returns the next maximal unexplored subset satisfying the cardinality floor,
    /// or `None` once the search space is exhausted.
    pub fn next_seed(&mut self) -> Option<Subset> {
        loop {
            self.solver.assume(&[]);
            if !self.solver.solve().expect("varisat solve must not error") {
                return None;
            }
            let seed = self.model_subset();
            if seed.len() < self.floor {
                trace!(size = seed.len(), floor = self.floor, "seed below cardinality floor, blocking");
                self.block_exact(&seed);
                continue;
            }
            return Some(self.maximize(seed));
        }
    }

    fn block_exact(&mut self, seed: &Subset) {
        let clause: Vec<Lit> = seed.iter().map(|&i| lit(i, false)).collect();
        self.solver.add_clause(&clause);
    }

    /// Blocks every subset of `frompoint`: forces the search to include at least
    /// one intent index outside it from now on.
    pub fn block_down(&mut self, frompoint: &Subset) {
        // If frompoint is the whole universe, the complement is empty and the clause
        // we add is the empty clause — a standing contradiction that exhausts the
        // search space, which is exactly right (nothing is left below the universe).
        let clause: Vec<Lit> = (1..=self.n)
            .filter(|i| !frompoint.contains(i))
            .map(|i| lit(i, true))
            .collect();
        self.solver.add_clause(&clause);
    }

    /// Blocks every superset of `frompoint`: forces at least one member of
    /// `frompoint` to be excluded from now on.
    pub fn block_up(&mut self, frompoint: &BTreeSet<IntentIndex>) {
        let clause: Vec<Lit> = frompoint.iter().map(|&i| lit(i, false)).collect();
        self.solver.add_clause(&clause);
    }
}
