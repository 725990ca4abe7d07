use clap::{ArgGroup, Parser, ValueEnum};
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::{IndicatifFilter, hide_indicatif_span_fields};
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::{
    Registry,
    fmt::format::{Format, PrettyFields},
    layer::SubscriberExt,
};
use tracing_subscriber::{filter::filter_fn, prelude::*};

/// Directory that receives one log file per run.
pub const LOG_DIR: &str = "/tmp/tibco-assist";

/// Spinner shown while waiting on the completion service.
pub fn progress_bar_without_pos() -> ProgressStyle {
    ProgressStyle::with_template(
        "{span_child_prefix} {spinner:.green} {wide_msg} [{elapsed_precise}]",
    )
    .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("logging"))]
pub struct LoggingOpts {
    /// A level of verbosity, and can be used multiple times
    #[arg(short, long, action = clap::ArgAction::Count, global(true))]
    pub verbose: u8,

    #[arg(
        long,
        global(true),
        default_value = "auto",
        env = "TIBCO_ASSIST_OUTPUT_PROGRESS"
    )]
    /// Set the progress output. Use plain to disable the spinner.
    pub progress: LoggingProgress,

    #[arg(skip = LevelFilter::WARN)]
    default_level: LevelFilter,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoggingProgress {
    /// Determine output format based on execution context
    Auto,
    /// Standard output, no spinner, no auto-updating output.
    Plain,
    /// Use spinner
    Tty,
}

impl LoggingProgress {
    fn is_tty(&self) -> bool {
        match self {
            LoggingProgress::Auto => std::io::stderr().is_terminal(),
            LoggingProgress::Plain => false,
            LoggingProgress::Tty => true,
        }
    }
}

lazy_static! {
    pub static ref STDOUT_WRITER: Arc<RwLock<Box<dyn Write + Sync + Send>>> =
        Arc::new(RwLock::new(Box::new(std::io::stdout())));
    pub static ref STDERR_WRITER: Arc<RwLock<Box<dyn Write + Sync + Send>>> =
        Arc::new(RwLock::new(Box::new(std::io::stderr())));
}

/// Keeps the file writer alive; dropping it flushes the log.
pub struct ConfiguredLogger {
    _guard: WorkerGuard,
    pub log_location: String,
}

impl LoggingOpts {
    pub fn with_new_default(&self, new_default: LevelFilter) -> Self {
        Self {
            verbose: self.verbose,
            progress: self.progress,
            default_level: new_default,
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => self.default_level,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn log_file_name(run_id: &str, prefix: &str) -> String {
        format!("{}/tibco-assist-{}-{}.log", LOG_DIR, prefix, run_id)
    }

    pub async fn configure_logging(&self, run_id: &str, prefix: &str) -> Result<ConfiguredLogger> {
        let log_location = Self::log_file_name(run_id, prefix);
        let (file_writer, guard) = open_log_file(&log_location)?;
        let file_output = tracing_subscriber::fmt::layer()
            .event_format(Format::default().pretty())
            .with_ansi(false)
            .with_writer(file_writer);

        let indicatif_layer = IndicatifLayer::new()
            .with_span_field_formatter(hide_indicatif_span_fields(DefaultFields::new()))
            .with_progress_style(progress_bar_without_pos());
        let console_writer = indicatif_layer.get_stderr_writer();
        *STDOUT_WRITER.write().await = Box::new(indicatif_layer.get_stdout_writer());
        *STDERR_WRITER.write().await = Box::new(indicatif_layer.get_stderr_writer());

        let spinner = self.progress.is_tty();
        let level_filter = self.to_level_filter();
        let console_output = tracing_subscriber::fmt::layer()
            .event_format(
                Format::default()
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .with_writer(console_writer)
            .fmt_fields(PrettyFields::new())
            .with_filter(filter_fn(move |metadata| {
                shown_on_console(metadata.target(), *metadata.level(), level_filter, spinner)
            }));

        // The spinner only exists on a terminal, plain mode gets `progress` lines instead.
        let progress_layer =
            spinner.then(|| indicatif_layer.with_filter(IndicatifFilter::new(false)));

        let subscriber = Registry::default()
            .with(console_output)
            .with(progress_layer)
            .with(file_output);
        tracing::subscriber::set_global_default(subscriber)
            .context("Unable to install the tracing subscriber")?;

        Ok(ConfiguredLogger {
            _guard: guard,
            log_location,
        })
    }
}

fn open_log_file(location: &str) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(LOG_DIR)
        .with_context(|| format!("Unable to create log directory {}", LOG_DIR))?;
    let log_file = File::create(PathBuf::from(location))
        .with_context(|| format!("Unable to create log file {}", location))?;

    Ok(tracing_appender::non_blocking(
        strip_ansi_escapes::Writer::new(log_file),
    ))
}

/// Console routing: `user` follows verbosity, `always` is always shown and
/// `progress` replaces the spinner when there is none. Everything else only
/// goes to the log file.
fn shown_on_console(target: &str, level: Level, level_filter: LevelFilter, spinner: bool) -> bool {
    match target {
        "user" => level_filter >= level,
        "always" => true,
        "progress" => !spinner,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(verbose: u8) -> LoggingOpts {
        LoggingOpts {
            verbose,
            progress: LoggingProgress::Plain,
            default_level: LevelFilter::WARN,
        }
    }

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(LevelFilter::WARN, opts(0).to_level_filter());
        assert_eq!(LevelFilter::INFO, opts(1).to_level_filter());
        assert_eq!(LevelFilter::DEBUG, opts(2).to_level_filter());
        assert_eq!(LevelFilter::TRACE, opts(5).to_level_filter());
    }

    #[test]
    fn test_new_default_only_applies_without_flags() {
        assert_eq!(
            LevelFilter::INFO,
            opts(0).with_new_default(LevelFilter::INFO).to_level_filter()
        );
        assert_eq!(
            LevelFilter::DEBUG,
            opts(2).with_new_default(LevelFilter::INFO).to_level_filter()
        );
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(
            "/tmp/tibco-assist/tibco-assist-root-20240101-abcd.log",
            LoggingOpts::log_file_name("20240101-abcd", "root")
        );
    }

    #[test]
    fn test_console_routing() {
        assert!(shown_on_console("user", Level::INFO, LevelFilter::INFO, true));
        assert!(!shown_on_console("user", Level::DEBUG, LevelFilter::INFO, true));
        assert!(shown_on_console("always", Level::TRACE, LevelFilter::WARN, true));
        assert!(shown_on_console("progress", Level::INFO, LevelFilter::WARN, false));
        assert!(!shown_on_console("progress", Level::INFO, LevelFilter::WARN, true));
        assert!(!shown_on_console("stdout", Level::INFO, LevelFilter::TRACE, false));
        assert!(!shown_on_console("tibco_assist::assist", Level::ERROR, LevelFilter::TRACE, false));
    }

    #[test]
    fn test_plain_progress_is_never_tty() {
        assert!(!LoggingProgress::Plain.is_tty());
        assert!(LoggingProgress::Tty.is_tty());
    }
}
