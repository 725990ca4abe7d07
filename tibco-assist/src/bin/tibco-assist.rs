//! tibco-assist CLI binary, a thin wrapper around the library.

mod cli;

use clap::{Parser, Subcommand};
use human_panic::setup_panic;
use tibco_assist::prelude::*;
use tracing::level_filters::LevelFilter;
use tracing::{Level, enabled, error, info};

/// tibco-assist
///
/// Generate test cases, complexity analysis, optimization recommendations,
/// documentation and migration guidance for TIBCO BusinessWorks processes
/// using a hosted LLM.
#[derive(Parser)]
#[clap(author, version, about)]
pub(crate) struct Cli {
    #[clap(flatten)]
    pub logging: LoggingOpts,

    #[clap(flatten)]
    pub config: ConfigOptions,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub(crate) struct VersionArgs {
    #[arg(long, action)]
    pub short: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Generate test cases for a process definition
    #[clap(alias("t"))]
    TestCases(TestCasesArgs),
    /// Analyze complexity, dependencies and anti-patterns
    #[clap(alias("c"))]
    Complexity(ComplexityArgs),
    /// Recommend performance, resource and structural optimizations
    #[clap(alias("o"))]
    Optimize(OptimizeArgs),
    /// Generate documentation for a process definition
    #[clap(alias("d"))]
    Docs(DocsArgs),
    /// Assess a process for migration to another platform
    #[clap(alias("m"))]
    Migrate(MigrateArgs),
    /// List the models that can be selected with --model
    Models,
    /// List the prompt templates and where each one comes from
    Templates,
    /// Print version info and exit
    #[clap(alias("v"))]
    Version(VersionArgs),
}

impl Command {
    fn log_prefix(&self) -> &'static str {
        match self {
            Command::TestCases(_) => "test-cases",
            Command::Complexity(_) => "complexity",
            Command::Optimize(_) => "optimize",
            Command::Docs(_) => "docs",
            Command::Migrate(_) => "migrate",
            Command::Models | Command::Templates | Command::Version(_) => "root",
        }
    }

    fn default_level(&self) -> LevelFilter {
        match self {
            Command::Models | Command::Templates | Command::Version(_) => LevelFilter::WARN,
            _ => LevelFilter::INFO,
        }
    }
}

#[tokio::main]
async fn main() {
    setup_panic!();

    dotenvy::dotenv().ok();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
    {
        dotenvy::from_path(exe_dir.join("../etc/tibco-assist.env")).ok();
    }

    let opts = Cli::parse();

    let logging = opts.logging.with_new_default(opts.command.default_level());
    let configured_logger = match logging
        .configure_logging(&opts.config.get_run_id(), opts.command.log_prefix())
        .await
    {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Unable to configure logging. {:?}", e);
            std::process::exit(1);
        }
    };

    let error_code = run_command(opts).await;

    if error_code != 0 || enabled!(Level::DEBUG) {
        info!(target: "always", "More detailed logs at {}", configured_logger.log_location);
    }

    drop(configured_logger);
    std::process::exit(error_code);
}

async fn run_command(opts: Cli) -> i32 {
    let config = match opts.config.load_config().await {
        Ok(c) => c,
        Err(e) => {
            error!(target: "always", "Failed to load configuration: {}", e);
            return 2;
        }
    };

    cli::commands::handle_command(&config, &opts.command)
        .await
        .unwrap_or_else(|e| {
            error!(target: "always", "Critical Error. {}", e);
            1
        })
}
