//! drift-looper - terminal front panel for the stereo looper
//!
//! Run with: cargo run -- --log looper.log

mod app;
mod panel;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::Level;

use app::App;
use drift_looper::LooperConfig;

#[derive(Parser)]
#[command(name = "drift-looper")]
#[command(about = "Stereo looper with wobble, slip and detune", long_about = None)]
struct Cli {
    /// TOML file overriding the default looper configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the wobble draws (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs to this file; the terminal belongs to the UI
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_logging(path, cli.verbose)?;
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LooperConfig::default(),
    };
    let seed = cli.seed.unwrap_or_else(rand::random);

    App::new(config, seed).run()
}

fn init_logging(path: &Path, verbose: u8) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(level)
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(path: &Path) -> EyreResult<LooperConfig> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config: LooperConfig =
        toml::from_str(&text).wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}
