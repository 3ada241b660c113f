use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct DeltaDistribution {
    pub count: u64,
    pub min: i64,
    pub max: i64,
    pub sum: i64,
}

impl DeltaDistribution {
    pub fn record(&mut self, delta: i64) {
        if self.count == 0 {
            self.min = delta;
            self.max = delta;
        } else {
            self.min = self.min.min(delta);
            self.max = self.max.max(delta);
        }
        self.sum += delta;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Per-phase timers, call counters and delta distributions collected across a full
/// driver run. Cheap enough to always collect; embedded verbatim in the output report.
#[derive(Debug, Default, Serialize)]
pub struct Stats {
    phase_time: BTreeMap<&'static str, Duration>,
    phase_calls: BTreeMap<&'static str, u64>,
    pub indeterminate_count: u64,
    pub rejected_seed_count: u64,
    delta_up: DeltaDistribution,
    delta_down: DeltaDistribution,
}

pub struct PhaseGuard<'s> {
    stats: &'s mut Stats,
    phase: &'static str,
    start: Instant,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.stats.phase_time.entry(self.phase).or_default() += self.start.elapsed();
        *self.stats.phase_calls.entry(self.phase).or_insert(0) += 1;
    }
}

impl Stats {
    pub fn time(&mut self, phase: &'static str) -> PhaseGuard<'_> {
        PhaseGuard {
            stats: self,
            phase,
            start: Instant::now(),
        }
    }

    pub fn record_delta(&mut self, old_len: usize, new_len: usize, direction_up: bool) {
        let delta = new_len as i64 - old_len as i64;
        if direction_up {
            self.delta_up.record(delta);
        } else {
            self.delta_down.record(delta);
        }
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            phase_seconds: self
                .phase_time
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_secs_f64()))
                .collect(),
            phase_calls: self.phase_calls.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            indeterminate_count: self.indeterminate_count,
            rejected_seed_count: self.rejected_seed_count,
            delta_up: self.delta_up.clone(),
            delta_down: self.delta_down.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub phase_seconds: BTreeMap<String, f64>,
    pub phase_calls: BTreeMap<String, u64>,
    pub indeterminate_count: u64,
    pub rejected_seed_count: u64,
    pub delta_up: DeltaDistribution,
    pub delta_down: DeltaDistribution,
}
