use thiserror::Error;

use crate::topology::NodeId;

/// Errors that abort a run before or during setup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("intent {intent_id:?} references unknown node {node:?}")]
    UnknownNode { intent_id: String, node: NodeId },
    #[error("intent {intent_id:?} of kind {kind} declares {count} path(s), need at least {min}")]
    TooFewPaths {
        intent_id: String,
        kind: &'static str,
        count: usize,
        min: usize,
    },
}

/// Conditions raised during enumeration. Most are recorded and do not abort the run;
/// see `Driver::run` for which variants stop the loop versus which are counted and
/// continued past.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("oracle could not converge after {iterations} CEGAR iterations over {subset_size} intents")]
    OracleIndeterminate { subset_size: usize, iterations: usize },
    #[error("underlying SMT/SAT backend reported an error: {0}")]
    SolverBackend(String),
}
