use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::RunConfig;
use crate::error::AnalysisError;
use crate::oracle::{Oracle, Subset, Verdict};
use crate::seed::SeedGenerator;
use crate::shrinker::Shrinker;
use crate::stats::{Stats, StatsSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StopReason {
    Exhausted,
    Timeout,
    MaxResults,
    Cancelled,
}

pub struct AnalysisResult {
    pub muses: Vec<Subset>,
    pub msses: Vec<Subset>,
    pub stats: StatsSummary,
    pub stop_reason: StopReason,
}

/// MARCO-style enumeration driver (C7): pulls maximal seeds from the Map Solver,
/// checks them against the oracle, and on UNSAT delegates to the shrinker before
/// blocking either up or down.
pub struct Driver<'o, 'ctx> {
    oracle: &'o Oracle<'ctx>,
    seed_gen: SeedGenerator,
    stats: Stats,
    config: RunConfig,
    known_muses: Vec<Subset>,
    known_msses: Vec<Subset>,
    max_mss_size: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'o, 'ctx> Driver<'o, 'ctx> {
    pub fn new(oracle: &'o Oracle<'ctx>, n_intents: usize, config: RunConfig) -> Self {
        Self {
            oracle,
            seed_gen: SeedGenerator::new(n_intents),
            stats: Stats::default(),
            config,
            known_muses: Vec::new(),
            known_msses: Vec::new(),
            max_mss_size: 0,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn result_count(&self) -> usize {
        self.known_muses.len() + self.known_msses.len()
    }

    fn record_sat(&mut self, seed: Subset) {
        self.stats.record_delta(self.max_mss_size, seed.len(), true);
        if seed.len() > self.max_mss_size {
            self.max_mss_size = seed.len();
            self.known_msses.retain(|m| m.len() == self.max_mss_size);
        }
        if seed.len() >= self.max_mss_size {
            info!(size = seed.len(), ids = ?self.oracle.intents().ids_of(&seed.iter().copied().collect::<Vec<_>>()), "found MSS");
            self.known_msses.push(seed.clone());
        }
        self.seed_gen.raise_floor(seed.len());
        let _guard = self.stats.time("block_down");
        self.seed_gen.block_down(&seed);
    }

    fn record_unsat(&mut self, seed: Subset) {
        let muses = {
            let _guard = self.stats.time("shrink");
            Shrinker::new(self.oracle).find_all_muses(&seed, &self.known_msses)
        };
        if muses.is_empty() {
            self.stats.rejected_seed_count += 1;
            let _guard = self.stats.time("block_up");
            self.seed_gen.block_up(&seed);
            return;
        }
        for mus in &muses {
            self.stats.record_delta(seed.len(), mus.len(), false);
            info!(size = mus.len(), ids = ?self.oracle.intents().ids_of(&mus.iter().copied().collect::<Vec<_>>()), "found MUS");
            self.known_muses.push(mus.clone());
            let _guard = self.stats.time("block_up");
            self.seed_gen.block_up(mus);
        }
    }

    pub fn run(mut self) -> AnalysisResult {
        let start = Instant::now();
        let stop_reason = loop {
            if start.elapsed() > self.config.timeout {
                break StopReason::Timeout;
            }
            if self.result_count() >= self.config.max_results {
                break StopReason::MaxResults;
            }
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }

            let seed = {
                let _guard = self.stats.time("seed");
                self.seed_gen.next_seed()
            };
            let Some(seed) = seed else {
                break StopReason::Exhausted;
            };

            let verdict = {
                let _guard = self.stats.time("check");
                self.oracle.check(&seed)
            };
            if let Verdict::Indeterminate { iterations } = &verdict {
                self.stats.indeterminate_count += 1;
                let reason = AnalysisError::OracleIndeterminate {
                    subset_size: seed.len(),
                    iterations: *iterations,
                };
                tracing::warn!(%reason, "treating indeterminate oracle verdict as UNSAT");
            }

            if verdict.is_sat() {
                self.record_sat(seed);
            } else {
                self.record_unsat(seed);
            }
        };

        info!(?stop_reason, muses = self.known_muses.len(), msses = self.known_msses.len(), "enumeration finished");

        AnalysisResult {
            muses: self.known_muses,
            msses: self.known_msses,
            stats: self.stats.summary(),
            stop_reason,
        }
    }
}
