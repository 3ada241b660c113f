use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use netintent_core::{build_report, loader, Bias, Driver, Oracle, RunConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Enumerate MUSes and MSSes of a set of routing intents over a topology")]
struct Opt {
    /// Path to the intents file (JSON)
    intents_path: PathBuf,
    /// Path to the topology file (JSON)
    topology_path: PathBuf,

    #[arg(long, value_enum, default_value = "MUSes")]
    bias: BiasArg,

    /// Timeout, in seconds
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Maximum number of MUS/MSS results to return
    #[arg(long = "max-results", default_value_t = 100)]
    max_results: usize,

    /// Write the JSON report to this path instead of only stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, short, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    #[arg(long, short, action = clap::ArgAction::SetTrue)]
    quiet: bool,

    /// Overrides the verbosity-derived log level
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum BiasArg {
    #[value(name = "MUSes")]
    Muses,
    #[value(name = "MSSes")]
    Msses,
}

impl From<BiasArg> for Bias {
    fn from(value: BiasArg) -> Self {
        match value {
            BiasArg::Muses => Bias::Muses,
            BiasArg::Msses => Bias::Msses,
        }
    }
}

fn init_logging(opt: &Opt) {
    let default_level = if let Some(level) = &opt.log_level {
        level.clone()
    } else if opt.quiet {
        "error".to_string()
    } else if opt.verbose {
        "debug".to_string()
    } else {
        "info".to_string()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(opt: Opt) -> anyhow::Result<()> {
    if !opt.intents_path.exists() {
        bail!("intents file does not exist: {}", opt.intents_path.display());
    }
    if !opt.topology_path.exists() {
        bail!("topology file does not exist: {}", opt.topology_path.display());
    }

    let topology = loader::load_topology(&opt.topology_path).context("loading topology")?;
    let intents = loader::load_intents(&opt.intents_path).context("loading intents")?;
    loader::validate_references(&topology, &intents).context("validating intent references")?;

    let n = intents.len();
    let config = RunConfig {
        bias: opt.bias.into(),
        timeout: Duration::from_secs(opt.timeout),
        max_results: opt.max_results,
    };

    let z3_config = z3::Config::new();
    let ctx = z3::Context::new(&z3_config);
    let oracle = Oracle::new(&ctx, topology, intents);

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)).context("installing Ctrl-C handler")?;

    let driver = Driver::new(&oracle, n, config.clone()).with_cancellation(cancel);
    let result = driver.run();

    let report = build_report(oracle.intents(), &config, result);
    let rendered = serde_json::to_string_pretty(&report).context("serializing report")?;

    println!("{rendered}");
    if let Some(output) = &opt.output {
        std::fs::write(output, &rendered).with_context(|| format!("writing report to {}", output.display()))?;
    }

    Ok(())
}

fn main() {
    let opt = Opt::parse();
    init_logging(&opt);
    if let Err(err) = run(opt) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
