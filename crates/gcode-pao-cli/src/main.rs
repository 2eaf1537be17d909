//! gcode-pao CLI - G-code parser, analyzer and optimizer
//!
//! Runs the interactive menu by default, or a single pass as a subcommand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gcode_pao::{load_with, optimize_in_place, save, Analyzer, Settings};
use log::{debug, info};
use std::path::{Path, PathBuf};

mod menu;
mod session;

#[derive(Parser)]
#[command(name = "gcode-pao")]
#[command(about = "Parse, analyze and optimize 3D printer G-code", long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log pass details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu
    Menu,
    /// Estimate print time and filament usage
    Analyze {
        /// Input G-code file
        input: PathBuf,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Limit wall-move feedrates and write the result
    Optimize {
        /// Input G-code file
        input: PathBuf,
        /// Output G-code file
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = match &cli.config {
        Some(path) => {
            let settings = Settings::load(path)
                .with_context(|| format!("failed to read settings from {}", path.display()))?;
            debug!("loaded settings from {}", path.display());
            settings
        }
        None => {
            debug!("no settings file given, using defaults");
            Settings::default()
        }
    };
    debug!("{settings:?}");

    match cli.command {
        Some(Commands::Analyze { input, json }) => {
            analyze_file(&input, json, &settings)?;
        }
        Some(Commands::Optimize { input, output }) => {
            optimize_file(&input, &output, &settings)?;
        }
        Some(Commands::Menu) | None => {
            menu::run(&mut session::Session::new(settings))?;
        }
    }

    Ok(())
}

fn analyze_file(input: &Path, json: bool, settings: &Settings) -> Result<()> {
    let parsed = load_with(input, &settings.parse)?;
    let analysis = Analyzer::new(settings.analysis.clone()).run(&parsed.commands)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", session::format_analysis(&analysis));
    }
    Ok(())
}

fn optimize_file(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    let mut commands = load_with(input, &settings.parse)?.commands;
    let clamped = optimize_in_place(&mut commands, &settings.optimize);
    info!(
        "limited {clamped} feedrates to F{}",
        settings.optimize.feedrate_ceiling
    );
    save(&commands, output)?;

    println!(
        "Optimized {} commands ({} feedrates limited) to {}",
        commands.len(),
        clamped,
        output.display()
    );
    Ok(())
}
