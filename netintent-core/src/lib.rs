pub mod config;
pub mod driver;
pub mod error;
pub mod hitting_set;
pub mod intent;
pub mod loader;
pub mod oracle;
pub mod path_cost;
pub mod report;
pub mod seed;
pub mod shrinker;
pub mod stats;
pub mod topology;

pub use config::{Bias, RunConfig};
pub use driver::{AnalysisResult, Driver, StopReason};
pub use error::{AnalysisError, LoadError};
pub use intent::{Intent, IntentKind, IntentSet};
pub use oracle::{Oracle, Subset, Verdict};
pub use report::{build_report, Report};
pub use topology::Topology;
