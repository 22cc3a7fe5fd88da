use clap::Parser;
use nstep_mc::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// n-step Monte Carlo value prediction on a gridworld.
#[derive(Parser, Debug)]
#[command(name = "nstep_mc")]
#[command(about = "Estimate a fixed policy's state values with n-step returns")]
struct Args {
    /// JSON config; the 3x3 sample grid is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Return horizon
    #[arg(short)]
    n: Option<usize>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f64>,

    /// Per-episode step cap
    #[arg(long)]
    max_steps: Option<usize>,

    /// Seed for start-state sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the report
    #[arg(short, long, default_value = "results")]
    output: PathBuf,
}

impl Args {
    fn config(&self) -> Result<PredictorConfig> {
        let mut cfg = match &self.config {
            Some(path) => PredictorConfig::from_file(path)?,
            None => PredictorConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            cfg.num_episodes = episodes;
        }
        if let Some(n) = self.n {
            cfg.n = n;
        }
        if let Some(gamma) = self.gamma {
            cfg.gamma = gamma;
        }
        if let Some(max_steps) = self.max_steps {
            cfg.max_steps = max_steps;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        cfg.validate()?;

        Ok(cfg)
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = args.config()?;
    info!(n = cfg.n, gamma = cfg.gamma, episodes = cfg.num_episodes, "training");

    let mut prediction = cfg.build()?;
    prediction.train(cfg.num_episodes)?;

    let report = TrainingReport::from_prediction(&prediction)?;
    info!("Final values:\n{}", report.value_grid());
    if let Some(s) = report.mse_summary() {
        info!(first = s.first, last = s.last, min = s.min, "mse");
    }
    report.write_to(&args.output)?;

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
