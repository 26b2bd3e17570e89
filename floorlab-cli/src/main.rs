//! floorlab CLI — run floor-protection simulations from the terminal.
//!
//! Commands:
//! - `run` — evaluate the configured policies and print a comparison table
//! - `init` — write a starter TOML config to the given path

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use floorlab_runner::{render_table, run_simulation, SimulationConfig};

#[derive(Parser)]
#[command(
    name = "floorlab",
    about = "floorlab CLI — floor-protected allocation simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the configured policies against one shared scenario set.
    Run {
        /// Path to a TOML config file. Omit to use the built-in defaults
        /// (10y monthly, 1000 scenarios, all five policy families).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the master seed from the config.
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the full report as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a starter config file with the default parameters.
    Init {
        /// Where to write the config.
        #[arg(default_value = "floorlab.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, seed, json } => run_cmd(config, seed, json),
        Commands::Init { path, force } => init_cmd(&path, force),
    }
}

fn run_cmd(config_path: Option<PathBuf>, seed: Option<u64>, json: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let report = run_simulation(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_table(&report));
    }
    Ok(())
}

fn init_cmd(path: &PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists — pass --force to overwrite",
            path.display()
        );
    }
    let text = toml::to_string_pretty(&SimulationConfig::default())?;
    std::fs::write(path, text)
        .with_context(|| format!("writing config to {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
