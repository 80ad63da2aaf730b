//! Type Defense - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use td_tools::simulate::{run_auto_typist, RunOptions};
use td_tools::validate::{load_config, validate_path};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "td-tools")]
#[command(about = "Development tools for Type Defense")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file or every .ron file in a directory
    Validate {
        /// Path to a config file or data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the tech unlock order
    Order {
        /// Path to a config file
        path: PathBuf,
    },
    /// Play a config headless with a perfect typist
    Simulate {
        /// Path to a config file
        path: PathBuf,
        /// Ticks to run at 60 Hz
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// Override the config seed
        #[arg(long)]
        seed: Option<u64>,
        /// Spawn an enemy every N ticks (0 disables)
        #[arg(long, default_value_t = 300)]
        wave_every: u64,
    },
}

fn run(cli: Cli) -> td_tools::Result<()> {
    match cli.command {
        Commands::Validate { path, json } => {
            tracing::info!("Validating data in: {}", path.display());
            let reports = validate_path(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!(
                        "{}: ok ({} producers, {} towers, {} tech nodes, {} letter stages)",
                        report.path,
                        report.producers,
                        report.towers,
                        report.tech_nodes,
                        report.letter_stages
                    );
                }
            }
        }
        Commands::Order { path } => {
            let config = load_config(&path)?;
            let graph = config.tech_graph()?;
            for (index, id) in graph.unlock_order().iter().enumerate() {
                let cost = graph.node(id).map_or(0, |node| node.cost);
                println!("{:>3}. {id} ({cost} KP)", index + 1);
            }
        }
        Commands::Simulate {
            path,
            ticks,
            seed,
            wave_every,
        } => {
            let config = load_config(&path)?;
            let summary = run_auto_typist(
                &config,
                RunOptions {
                    ticks,
                    seed,
                    wave_every,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
