use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fleet_core::{ExpirationDecision, WorkerId};
use fleet_registry::WorkerRegistry;
use fleet_runner::{expand_path, group_by_context, load_fleet, Config, Expirer};

#[derive(Parser)]
#[command(name = "fleet", version)]
struct Cli {
    /// Config file (default: .fleet/fleet.toml under the current directory)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config
    Init,

    /// List workers in a fleet file, grouped by identical context
    Status {
        #[arg(long)]
        fleet: PathBuf,
    },

    /// Decide whether one worker should expire
    Evaluate {
        #[arg(long)]
        fleet: PathBuf,
        #[arg(long)]
        target: String,
    },

    /// Evaluate every worker in a fleet file
    Sweep {
        #[arg(long)]
        fleet: PathBuf,
        /// Mark expired workers as stopping (default only reports)
        #[arg(long)]
        apply: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let cfg_path = match &cli.config {
        Some(p) => expand_path(p),
        None => Config::config_path(&std::env::current_dir()?),
    };

    match cli.cmd {
        Command::Init => {
            if cfg_path.exists() {
                println!("Config already exists at {}", cfg_path.display());
            } else {
                Config::default().save_to(&cfg_path)?;
                println!("Wrote {}", cfg_path.display());
            }
        }
        Command::Status { fleet } => {
            let fleet = load_fleet(&fleet)?;
            let now = fleet.clock();
            let snap = fleet.into_registry()?.snapshot(now)?;
            println!("Workers: {} (idle {})", snap.workers.len(), snap.idle().count());
            for (digest, workers) in group_by_context(&snap)? {
                println!("context {}", &digest[..12]);
                for w in workers {
                    println!("- {} [{:?}] idle since {}", w.id, w.state, w.last_idle_ms);
                }
            }
        }
        Command::Evaluate { fleet, target } => {
            let cfg = Config::load_or_default(&cfg_path)?;
            let fleet = load_fleet(&fleet)?;
            let now = fleet.clock();
            let ex = Expirer::new(Box::new(fleet.into_registry()?), &cfg);
            let decision = ex.evaluate(now, &WorkerId::from_str(target.clone()))?;
            match decision {
                ExpirationDecision::GracefulExpire => println!("{target}: graceful expire"),
                ExpirationDecision::DoNotExpire => println!("{target}: keep"),
            }
        }
        Command::Sweep { fleet, apply, json } => {
            let cfg = Config::load_or_default(&cfg_path)?;
            debug!(timeout_ms = cfg.expiration.idle_compatible_timeout_ms, "loaded config");
            let fleet = load_fleet(&fleet)?;
            let now = fleet.clock();
            let ex = Expirer::new(Box::new(fleet.into_registry()?), &cfg);
            let report = ex.run_once(now, !apply)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Evaluated {} workers, keeping {}", report.evaluated, report.kept);
                for id in &report.expired {
                    println!("- expire {id}");
                }
            }
        }
    }

    Ok(())
}
