mod cmd;
mod output;
mod root;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use kvp_core::{config::Config, role::Role, task::parse_due_date};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kvp",
    about = "PDCA continuous-improvement tracker: plan, do, check, act",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working directory used to find .kvp/config.yaml (default: auto-detect)
    #[arg(long, global = true, env = "KVP_ROOT")]
    root: Option<PathBuf>,

    /// Explicit config file (overrides .kvp/config.yaml)
    #[arg(long, global = true, env = "KVP_CONFIG")]
    config: Option<PathBuf>,

    /// Session role: admin, editor or reader (default from config)
    #[arg(long, global = true, env = "KVP_ROLE")]
    role: Option<String>,

    /// Reference date for overdue detection, YYYY-MM-DD (default: today)
    #[arg(long, global = true, env = "KVP_TODAY")]
    today: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demonstration project and show its dashboard
    Sample {
        /// Write the JSON export into this directory (bare flag: config export_dir)
        #[arg(long, value_name = "DIR")]
        export: Option<Option<PathBuf>>,
    },

    /// Execute a YAML session script against a fresh in-memory session
    Run {
        script: PathBuf,
        /// Write the JSON export of the active project into this directory
        /// (bare flag: config export_dir)
        #[arg(long, value_name = "DIR")]
        export: Option<Option<PathBuf>>,
    },

    /// Show the dashboard of an exported project file
    Show { file: PathBuf },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Everything a command needs that comes from flags, env and config.
pub struct RunContext {
    pub root: PathBuf,
    pub config: Config,
    pub role: Role,
    pub today: NaiveDate,
    pub json: bool,
}

impl RunContext {
    /// Resolve the `--export` flag: an explicit directory wins, a bare flag
    /// uses the configured `export_dir` (relative to the root), no flag means
    /// no export.
    pub fn export_dir(&self, flag: Option<Option<PathBuf>>) -> Option<PathBuf> {
        flag.map(|dir| dir.unwrap_or_else(|| self.root.join(&self.config.export_dir)))
    }
}

fn build_context(cli: &Cli) -> anyhow::Result<RunContext> {
    let root = root::resolve_root(cli.root.as_deref());
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(&root),
    }
    .context("failed to load config")?;

    let role = match &cli.role {
        Some(r) => r.parse::<Role>().context("invalid --role")?,
        None => config.default_role,
    };
    let today = match &cli.today {
        Some(d) => parse_due_date(d).context("invalid --today")?,
        None => Local::now().date_naive(),
    };

    Ok(RunContext {
        root,
        config,
        role,
        today,
        json: cli.json,
    })
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = build_context(&cli).and_then(|ctx| match cli.command {
        Commands::Sample { export } => {
            let dir = ctx.export_dir(export);
            cmd::sample::run(&ctx, dir.as_deref())
        }
        Commands::Run { script, export } => {
            let dir = ctx.export_dir(export);
            cmd::run::run(&ctx, &script, dir.as_deref())
        }
        Commands::Show { file } => cmd::show::run(&ctx, &file),
        Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
