//! redis-compat: inspect reply and argument conversions
//!
//! # Usage
//!
//! ```bash
//! # Parse an INFO dump
//! redis-cli INFO | redis-compat info --format json
//!
//! # Show the SORT arguments for a set of options
//! redis-compat sort --by 'weight_*' --get '#' --limit 0 10 --desc
//!
//! # Show BLPOP arguments
//! redis-compat bpop --timeout 5 jobs:high jobs:low
//!
//! # Show LINSERT arguments
//! redis-compat linsert --position after mylist pivot value
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use redis_compat::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "redis-compat")]
#[command(version)]
#[command(about = "Inspect Redis reply and argument conversions", long_about = None)]
#[command(after_help = "EXAMPLES:
    redis-cli INFO | redis-compat info
    redis-compat sort --by 'weight_*' --get '#' --desc --alpha
    redis-compat bpop --timeout 5 queue:a queue:b
    redis-compat linsert --position before mylist pivot value")]
struct Cli {
    /// Config file (defaults to ./redis-compat.toml, then the user config dir)
    #[arg(long, global = true, env = "REDIS_COMPAT_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum InsertPosition {
    Before,
    After,
}

impl From<InsertPosition> for Position {
    fn from(position: InsertPosition) -> Self {
        match position {
            InsertPosition::Before => Position::Before,
            InsertPosition::After => Position::After,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse INFO output from a file or stdin
    Info {
        /// File holding the INFO reply; stdin when omitted
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the native SORT arguments for the given options
    Sort {
        /// BY pattern
        #[arg(long)]
        by: Option<String>,

        /// GET pattern (repeatable)
        #[arg(long)]
        get: Vec<String>,

        /// LIMIT offset count
        #[arg(long, num_args = 2, value_names = ["OFFSET", "COUNT"], allow_hyphen_values = true)]
        limit: Option<Vec<i64>>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Compare lexicographically
        #[arg(long)]
        alpha: bool,
    },
    /// Print BLPOP/BRPOP arguments
    Bpop {
        /// Timeout in seconds
        #[arg(short, long, default_value = "0")]
        timeout: i32,

        /// Keys to pop from, in priority order
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print LINSERT arguments
    Linsert {
        /// Where to insert relative to the pivot
        #[arg(short, long, value_enum)]
        position: Option<InsertPosition>,

        key: String,
        pivot: String,
        value: String,
    },
    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = CompatConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match &cli.command {
        Commands::Info { path, format } => show_info(path.as_deref(), format),
        Commands::Sort {
            by,
            get,
            limit,
            desc,
            alpha,
        } => {
            let mut params = SortParameters::new();
            if let Some(by) = by {
                params = params.by(by.as_bytes());
            }
            for pattern in get {
                params = params.get(pattern.as_bytes());
            }
            if let Some(&[offset, count]) = limit.as_deref() {
                params = params.limit(offset, count);
            }
            if *desc {
                params = params.order(Order::Desc);
            }
            if *alpha {
                params = params.alpha(true);
            }

            let native = convert_sort_params(Some(&params))?.unwrap_or_default();
            print_args("SORT", native.params(), &config)
        }
        Commands::Bpop { timeout, keys } => {
            let args = bxpop_args(*timeout, keys);
            print_args("BLPOP", &args, &config)
        }
        Commands::Linsert {
            position,
            key,
            pivot,
            value,
        } => {
            let converter = Converter::new(config.clone());
            let native = converter.convert_position(position.map(Position::from))?;
            let args = vec![
                key.as_bytes().to_vec(),
                native.as_bytes().to_vec(),
                pivot.as_bytes().to_vec(),
                value.as_bytes().to_vec(),
            ];
            print_args("LINSERT", &args, &config)
        }
        Commands::Config => {
            let text = config
                .to_toml_string()
                .context("Failed to render config")?;
            print!("{}", text);
            Ok(())
        }
    }
}

fn show_info(path: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let props = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_info(BufReader::new(file))?
        }
        None => read_info(io::stdin().lock())?,
    };

    if props.is_empty() {
        println!("{}", "(no properties)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&props)?);
        }
        OutputFormat::Table => {
            let width = props.keys().map(str::len).max().unwrap_or(0);
            for (key, value) in props.iter() {
                println!("{:width$} │ {}", key.cyan(), value, width = width);
            }
            println!();
            println!("{} propert(ies)", props.len().to_string().cyan());
        }
    }
    Ok(())
}

fn print_args(command: &str, args: &[Vec<u8>], config: &CompatConfig) -> Result<()> {
    let converter = Converter::new(config.clone());
    let rendered = converter.decode_strings(args)?;
    println!("{} {}", command.green().bold(), rendered.join(" ").white());
    Ok(())
}
