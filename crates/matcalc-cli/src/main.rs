mod config;
mod eval;
mod plain;
#[cfg(feature = "tui")]
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use matcalc_core::{Operation, Session, Settings};

#[derive(Parser)]
#[command(
    name = "matcalc",
    version,
    about = "Interactive linear-algebra calculator for matrices and vectors"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive calculator in the terminal UI (default)
    Tui,

    /// Run the interactive calculator line by line on stdin/stdout
    Plain,

    /// Evaluate a single operation and print the result
    Eval {
        /// First operand, e.g. "1,2;3,4"
        #[arg(short, long, allow_hyphen_values = true)]
        a: String,

        /// Operation to run
        #[arg(short, long)]
        op: CliOperation,

        /// Second operand (inner, outer, multiply)
        #[arg(short, long, allow_hyphen_values = true)]
        b: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,
}

#[derive(Clone, ValueEnum)]
enum CliOperation {
    Det,
    Norm,
    Nullspace,
    Inner,
    Outer,
    Multiply,
}

impl From<CliOperation> for Operation {
    fn from(val: CliOperation) -> Self {
        match val {
            CliOperation::Det => Operation::Det,
            CliOperation::Norm => Operation::Norm,
            CliOperation::Nullspace => Operation::Nullspace,
            CliOperation::Inner => Operation::Inner,
            CliOperation::Outer => Operation::Outer,
            CliOperation::Multiply => Operation::Multiply,
        }
    }
}

fn init_logging(file: Option<&str>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());

    match file {
        Some(path) => {
            let log = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {path}"))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(log))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    init_logging(cfg.log.file.as_deref())?;
    let settings = cfg.settings();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => cmd_tui(settings),
        Commands::Plain => cmd_plain(settings),
        Commands::Eval { a, op, b, json } => {
            eval::cmd_eval(&a, op.into(), b.as_deref(), json, &settings)
        }
        Commands::Config => cmd_config(cli.config.as_deref(), &cfg),
    }
}

// ---------------------------------------------------------------------------
// Interactive front ends
// ---------------------------------------------------------------------------

#[cfg(feature = "tui")]
fn cmd_tui(settings: Settings) -> Result<()> {
    let mut session = Session::new(settings);
    tui::run_tui(&mut session)
}

#[cfg(not(feature = "tui"))]
fn cmd_tui(settings: Settings) -> Result<()> {
    tracing::warn!("tui feature not enabled, falling back to plain mode");
    cmd_plain(settings)
}

fn cmd_plain(settings: Settings) -> Result<()> {
    let mut session = Session::new(settings);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    plain::run_plain(&mut session, stdin.lock(), &mut stdout)
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(explicit: Option<&Path>, cfg: &config::Config) -> Result<()> {
    println!("Config: {}", config::show_config_path(explicit));
    println!();
    println!("[numeric]");
    println!("  zero_tolerance = {:e}", cfg.numeric.zero_tolerance);
    println!("  nullspace_basis = {}", cfg.numeric.nullspace_basis);
    println!();
    println!("[display]");
    match cfg.display.precision {
        Some(p) => println!("  precision = {p}"),
        None => println!("  precision = (shortest exact)"),
    }
    println!();
    println!("[log]");
    println!(
        "  file = {}",
        cfg.log.file.as_deref().unwrap_or("(stderr)")
    );
    Ok(())
}
