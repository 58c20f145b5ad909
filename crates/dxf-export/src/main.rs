use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

use dxf_export::commands::{assembly, bom, columns, flip};
use dxf_export::config::ExportConfig;
use dxf_export::utils::{color, format::readable_duration};

#[derive(Parser)]
#[command(name = "exportdxf")]
#[command(about = "Flat pattern flip decisions and part lists for DXF export", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Configuration file (defaults to exportdxf.toml in the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide which flat pattern views to flip
    Flip(flip::FlipArgs),

    /// List the parts on BOM tables
    Bom(bom::BomArgs),

    /// List the parts in an assembly
    #[command(alias = "asm")]
    Assembly(assembly::AssemblyArgs),

    /// Show how BOM columns are resolved
    Columns(columns::ColumnsArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    color::init_color(cli.no_color);

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = ExportConfig::load(cli.config.as_deref(), &cwd)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let c = cancel.clone();
    ctrlc::set_handler(move || {
        c.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let start = Instant::now();

    let result = match cli.command {
        Commands::Flip(args) => flip::execute(args, &config, &cancel),
        Commands::Bom(args) => bom::execute(args, &config, &cancel),
        Commands::Assembly(args) => assembly::execute(args, &config, &cancel),
        Commands::Columns(args) => columns::execute(args),
    };

    if cancel.load(Ordering::SeqCst) {
        eprintln!("{}", "Cancelled".yellow());
    }
    log::info!("Run time: {}", readable_duration(start.elapsed()));

    result
}
