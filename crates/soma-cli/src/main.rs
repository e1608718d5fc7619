//! Soma CLI - run and validate chemotactic cell sorting simulations.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soma")]
#[command(author, version, about = "Soma - Chemotactic cell sorting in 3D", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default soma.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the simulation, then validate the final arrangement
    Run {
        /// Number of steps to run
        #[arg(short, long)]
        steps: Option<u64>,

        /// Total number of cells, split evenly between types +1 and -1
        #[arg(short, long)]
        cells: Option<usize>,

        /// Seed for random placement
        #[arg(long)]
        seed: Option<u64>,

        /// Close-pair radius
        #[arg(short, long)]
        radius: Option<f64>,

        /// Expected subvolume population (default: a quarter of the cells)
        #[arg(short, long)]
        target: Option<usize>,

        /// Write the final snapshot to this JSON file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a saved snapshot
    Validate {
        /// Snapshot JSON file
        snapshot: String,

        /// Close-pair radius
        #[arg(short, long)]
        radius: Option<f64>,

        /// Expected subvolume population (default: a quarter of the cells)
        #[arg(short, long)]
        target: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let passed = match cli.command {
        Commands::Init { path } => {
            commands::init::run(path)?;
            true
        }
        Commands::Run { steps, cells, seed, radius, target, output } => {
            commands::run::run(
                commands::run::RunOverrides { steps, cells, seed, radius, target, output },
                cli.verbose,
            )?
        }
        Commands::Validate { snapshot, radius, target } => {
            commands::validate::run(&snapshot, radius, target)?
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
