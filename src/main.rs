use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use morphtree::{AppError, Experience, TreeConfig, TreeState};

/// Particle tree that assembles and scatters on click.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON scene config; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// Open already assembled
    #[arg(long)]
    formed: bool,

    /// Number of foliage points
    #[arg(long)]
    foliage: Option<u32>,

    /// Advance each frame by this many seconds instead of wall-clock time
    #[arg(long, value_name = "SECONDS")]
    fixed_step: Option<f32>,
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            TreeConfig::load(path)?
        }
        None => TreeConfig::default(),
    };

    let mut experience = Experience::new().with_config(config);
    if let Some(seed) = args.seed {
        experience = experience.with_seed(seed);
    }
    if let Some(count) = args.foliage {
        experience = experience.with_foliage_count(count);
    }
    if let Some(step) = args.fixed_step {
        experience = experience.with_fixed_step(step);
    }
    if args.formed {
        experience = experience.with_initial_state(TreeState::Formed);
    }

    experience.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
