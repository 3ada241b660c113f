use std::time::Duration;

use env_param::EnvParam;
use serde::{Deserialize, Serialize};

/// Additive constant in the CEGAR iteration cap `2 * |subset| + CEGAR_ITERATION_SLACK`.
/// Tunable without recompiling, matching how the corpus exposes internal solver knobs.
pub static CEGAR_ITERATION_SLACK: EnvParam<u32> = EnvParam::new("NETINTENT_CEGAR_ITERATION_SLACK", "5");

/// Above this many MCSes, hitting-set mining switches from exact enumeration to a
/// greedy most-uncovered-first heuristic.
pub static EXACT_HITTING_SET_MCS_LIMIT: EnvParam<usize> = EnvParam::new("NETINTENT_EXACT_HITTING_SET_MCS_LIMIT", "5");

/// Number of shortest candidate paths the oracle enumerates per intent when looking
/// for counterexamples during CEGAR refinement.
pub static CANDIDATE_PATH_WIDTH: EnvParam<usize> = EnvParam::new("NETINTENT_CANDIDATE_PATH_WIDTH", "10");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    #[serde(rename = "MUSes")]
    Muses,
    #[serde(rename = "MSSes")]
    Msses,
}

impl Default for Bias {
    fn default() -> Self {
        Bias::Muses
    }
}

/// Run-level policy, as opposed to the algorithm-internal constants above: the
/// CLI-visible knobs that control how long and how far one analysis runs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub bias: Bias,
    pub timeout: Duration,
    pub max_results: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bias: Bias::Muses,
            timeout: Duration::from_secs(300),
            max_results: 100,
        }
    }
}
