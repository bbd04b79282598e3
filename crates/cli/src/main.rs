//! globwatch CLI - classified file change events for a glob

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod settings;

use settings::Overrides;

/// globwatch - report create/modify/delete events for files matching a glob
#[derive(Parser)]
#[command(name = "globwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch files matching a glob and print one line per event
    Watch {
        /// Glob matched against paths relative to the root (e.g. "**/*.rs")
        pattern: String,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        opts: WatchArgs,
    },
    /// Show the effective configuration
    Config {
        /// Print an annotated example config instead
        #[arg(long)]
        example: bool,

        #[command(flatten)]
        opts: WatchArgs,
    },
}

#[derive(Args)]
struct WatchArgs {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to watch (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Only watch the root directory itself
    #[arg(long)]
    no_recursive: bool,

    /// Freshness window for create and modify, in milliseconds
    #[arg(long)]
    threshold_ms: Option<u64>,

    /// How repeated notifications for a missing file are reported
    #[arg(long, value_enum)]
    delete_mode: Option<DeleteModeArg>,

    /// Gitignore-style pattern to skip (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Skip paths ignored by the root's .gitignore
    #[arg(long)]
    gitignore: bool,

    /// Match the glob case-insensitively
    #[arg(short = 'i', long)]
    ignore_case: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeleteModeArg {
    Repeat,
    Once,
}

impl From<DeleteModeArg> for globwatch::DeleteMode {
    fn from(arg: DeleteModeArg) -> Self {
        match arg {
            DeleteModeArg::Repeat => globwatch::DeleteMode::Repeat,
            DeleteModeArg::Once => globwatch::DeleteMode::Once,
        }
    }
}

impl WatchArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            no_recursive: self.no_recursive,
            threshold_ms: self.threshold_ms,
            delete_mode: self.delete_mode.map(Into::into),
            exclude: self.exclude.clone(),
            gitignore: self.gitignore,
            ignore_case: self.ignore_case,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "globwatch=debug,info",
        _ => "globwatch=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Events go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Watch { pattern, json, opts } => {
            let options = settings::load(opts.config.as_deref(), &opts.overrides())?;
            cmd::watch::run(&pattern, options, json).await
        }
        Commands::Config { example, opts } => {
            if example {
                cmd::config::run_example().await
            } else {
                cmd::config::run_show(opts.config.as_deref(), &opts.overrides()).await
            }
        }
    }
}
