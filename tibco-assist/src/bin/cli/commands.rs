//! Command routing and the small informational commands.

use crate::{Command, VersionArgs};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use strum::IntoEnumIterator;
use tibco_assist::prelude::*;
use tibco_assist::report_stdout;
use tracing::instrument;

/// Route a command to its appropriate handler.
pub async fn handle_command(found_config: &FoundConfig, command: &Command) -> Result<i32> {
    match command {
        Command::TestCases(args) => test_cases_root(found_config, args).await,
        Command::Complexity(args) => complexity_root(found_config, args).await,
        Command::Optimize(args) => optimize_root(found_config, args).await,
        Command::Docs(args) => docs_root(found_config, args).await,
        Command::Migrate(args) => migrate_root(found_config, args).await,
        Command::Models => print_models(found_config).await.map(|_| 0),
        Command::Templates => print_templates(found_config).await.map(|_| 0),
        Command::Version(args) => print_version(args).await,
    }
}

#[instrument("tibco-assist models", skip_all)]
async fn print_models(found_config: &FoundConfig) -> Result<()> {
    report_stdout!("  {:30}{}", "Name".white().bold(), "Notes".white().bold());
    for model in ModelChoice::all() {
        let mut notes = Vec::new();
        if model == ModelChoice::default() {
            notes.push("default");
        }
        if model == found_config.model {
            notes.push("selected");
        }
        report_stdout!("- {:30}{}", model.to_string(), notes.join(", "));
    }
    Ok(())
}

#[instrument("tibco-assist templates", skip_all)]
async fn print_templates(found_config: &FoundConfig) -> Result<()> {
    report_stdout!(
        "  {:20}{:14}{:12}{}",
        "Name".white().bold(),
        "Temperature".white().bold(),
        "Max Tokens".white().bold(),
        "Source".white().bold()
    );
    for kind in PromptKind::iter() {
        let source = match found_config.templates.origin(kind) {
            TemplateOrigin::BuiltIn => "built-in".to_string(),
            TemplateOrigin::File(path) => relative_to(&path, found_config),
        };
        report_stdout!(
            "- {:20}{:<14}{:<12}{}",
            kind.to_string(),
            kind.temperature(),
            kind.max_tokens(),
            source
        );
    }
    Ok(())
}

fn relative_to(path: &str, found_config: &FoundConfig) -> String {
    std::path::Path::new(path)
        .strip_prefix(&found_config.working_dir)
        .map(|x| x.display().to_string())
        .unwrap_or_else(|_| path.to_string())
}

#[instrument("tibco-assist version", skip_all)]
async fn print_version(args: &VersionArgs) -> Result<i32> {
    if args.short {
        report_stdout!("tibco-assist {}", env!("CARGO_PKG_VERSION"));
    } else {
        report_stdout!(
            "{}: {:60}",
            "Version".white().bold(),
            env!("CARGO_PKG_VERSION")
        );
        report_stdout!(
            "{}: {:60}",
            "Build Timestamp".white().bold(),
            env!("VERGEN_BUILD_TIMESTAMP")
        );
        report_stdout!(
            "{}: {:60}",
            "Describe".white().bold(),
            env!("VERGEN_GIT_DESCRIBE")
        );
        report_stdout!(
            "{}: {:60}",
            "Commit SHA".white().bold(),
            env!("VERGEN_GIT_SHA")
        );
        report_stdout!(
            "{}: {:60}",
            "Commit Date".white().bold(),
            env!("VERGEN_GIT_COMMIT_DATE")
        );
    }

    Ok(0)
}
