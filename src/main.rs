//! Command-line interface for epf2bson
//!
//! # Usage Examples
//!
//! ```bash
//! # Export a full EPF feed
//! epf2bson --epf ./itunes20240101 --db-name itunes
//!
//! # Export a subset into a custom dump directory, with debug logs
//! epf2bson -e ./itunes20240101 -n itunes -d ./dump-2024 -l application,artist -v
//!
//! # Then load it
//! mongorestore ./dump
//! ```

use clap::Parser;
use epf2bson::{parse_include_list, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "epf2bson")]
#[command(about = "A tool for converting iTunes EPF files into a BSON dump")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding the EPF files
    #[arg(short = 'e', long = "epf", env = "EPF2BSON_EPF_DIR", value_name = "DIR")]
    epf_dir: PathBuf,

    /// Target database name
    #[arg(short = 'n', long, value_name = "NAME")]
    db_name: String,

    /// Dump directory to create (must not exist)
    #[arg(short = 'd', long, default_value = epf2bson::config::DEFAULT_DUMP_DIR, value_name = "DIR")]
    dump_dir: PathBuf,

    /// Comma separated list of EPF file names to export (default: all files)
    #[arg(short = 'l', long = "list", value_name = "LIST")]
    include: Option<String>,

    /// Log debug messages (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config {
        epf_dir: cli.epf_dir,
        db_name: cli.db_name,
        dump_dir: cli.dump_dir,
        include: cli.include.as_deref().map(parse_include_list),
        ..Config::default()
    };

    epf2bson::run(&config)?;
    Ok(())
}
