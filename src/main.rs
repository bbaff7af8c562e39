// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! vpm CLI - find, register and jump between local git checkouts

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use vpm::commands::{self, list::ListFormat, CommandContext};
use vpm::output::Output;

#[derive(Parser)]
#[command(name = "vpm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "VPM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Registry directory override
    #[arg(long, env = "VPM_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Disable colored output (any non-empty NO_COLOR other than 0/false/no/off)
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find git checkouts under a directory and register them
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum directory depth (defaults to the configured scan depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Report what would be registered without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a `cd` command for the project matching a keyword
    Go {
        /// Case-insensitive substring of "hostname owner repo"
        keyword: String,

        /// Take the first match when several projects match
        #[arg(long)]
        first: bool,
    },

    /// List registered projects
    List {
        /// Only projects on this hostname
        #[arg(long)]
        host: Option<String>,

        /// Only projects below this directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output layout
        #[arg(short, long, value_enum, default_value_t)]
        format: ListFormat,
    },

    /// Clone a repository into its canonical location and register it
    Add {
        /// Repository URL or alias:owner/repo
        repo: String,

        /// Show what would be done without cloning
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(!cli.no_color, cli.quiet);

    match run(cli, output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let mut config = vpm::config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }

    let ctx = CommandContext {
        config,
        output,
        json: cli.json,
    };

    // Execute command
    match cli.command {
        Commands::Scan { path, depth, dry_run } => commands::scan::run(&ctx, path, depth, dry_run).await,
        Commands::Go { keyword, first } => commands::go::run(&ctx, &keyword, first),
        Commands::List { host, dir, format } => commands::list::run(&ctx, host.as_deref(), dir, format),
        Commands::Add { repo, dry_run } => commands::add::run(&ctx, &repo, dry_run).await,
        Commands::Config => commands::config::run(&ctx),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
