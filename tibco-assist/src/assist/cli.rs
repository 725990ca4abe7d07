use super::api::{ActionOutcome, report_outcome, run_action};
use super::assistant::Assistant;
use super::error::ValidationError;
use super::options::*;
use crate::cli::InquireInteraction;
use crate::internal::interaction::UserInteraction;
use crate::report_stdout;
use crate::shared::prelude::*;
use anyhow::Result;
use clap::{ArgAction, Args};
use secrecy::SecretString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Process definition to read (.xml, .txt, .bwp, .process), for stdin use '-'
    #[arg(conflicts_with = "code")]
    pub location: Option<String>,

    /// Process code/XML given inline
    #[arg(long)]
    pub code: Option<String>,

    /// Print the collected input before sending it
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Print the result exactly as returned, without formatting
    #[arg(long)]
    pub raw: bool,

    /// Also write the unformatted result to this file, relative to the working directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TestCasesArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Test scenario types to cover
    #[arg(
        long = "test-type",
        short = 't',
        value_enum,
        value_delimiter = ',',
        num_args = 1,
        action = ArgAction::Append,
        default_values = ["happy-path", "edge-cases", "error-scenarios"]
    )]
    pub test_types: Vec<TestType>,

    /// How thorough the generated tests should be
    #[arg(long, value_enum, default_value = "intermediate")]
    pub complexity: ComplexityLevel,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ComplexityArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Areas the analysis should cover
    #[arg(
        long = "focus",
        short = 'f',
        value_enum,
        value_delimiter = ',',
        num_args = 1,
        action = ArgAction::Append,
        default_values = ["cyclomatic-complexity", "dependencies", "anti-patterns"]
    )]
    pub analysis_types: Vec<AnalysisFocus>,

    /// How much detail to ask for
    #[arg(long, value_enum, default_value = "detailed")]
    pub detail: DetailLevel,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct OptimizeArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Areas to optimize
    #[arg(
        long = "area",
        short = 'a',
        value_enum,
        value_delimiter = ',',
        num_args = 1,
        action = ArgAction::Append,
        default_values = ["performance", "error-handling", "resource-management"]
    )]
    pub optimization_areas: Vec<OptimizationArea>,

    /// Which recommendations to put first
    #[arg(long, value_enum, default_value = "balanced")]
    pub priority: PriorityLevel,

    /// Don't ask for before/after code examples
    #[arg(long)]
    pub no_examples: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct DocsArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Documents to produce
    #[arg(
        long = "doc-type",
        short = 'd',
        value_enum,
        value_delimiter = ',',
        num_args = 1,
        action = ArgAction::Append,
        default_values = ["process-overview", "technical-spec"]
    )]
    pub doc_types: Vec<DocType>,

    /// Format of the generated documentation
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Ask for a text diagram of the process flow
    #[arg(long)]
    pub diagrams: bool,

    /// Save the documentation as tibco_documentation.<ext> in the working directory
    #[arg(long)]
    pub save: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Migration concerns to assess
    #[arg(
        long = "area",
        short = 'a',
        value_enum,
        value_delimiter = ',',
        num_args = 1,
        action = ArgAction::Append,
        default_values = ["bw5-to-bw6", "container-readiness"]
    )]
    pub migration_areas: Vec<MigrationArea>,

    /// Platform to migrate to
    #[arg(long, value_enum, default_value = "bw6")]
    pub target: MigrationTarget,

    /// Don't ask for migrated code examples
    #[arg(long)]
    pub no_examples: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

pub async fn test_cases_root(found_config: &FoundConfig, args: &TestCasesArgs) -> Result<i32> {
    let interaction = InquireInteraction;
    let code = collect_code(&args.input, &interaction).await?;
    let request = ActionRequest::TestCases(TestCaseRequest {
        code,
        test_types: args.test_types.clone(),
        complexity_level: args.complexity,
    });
    let outcome = execute(found_config, &request, &interaction).await?;
    print_outcome(found_config, &outcome, &args.output).await
}

pub async fn complexity_root(found_config: &FoundConfig, args: &ComplexityArgs) -> Result<i32> {
    let interaction = InquireInteraction;
    let code = collect_code(&args.input, &interaction).await?;
    let request = ActionRequest::Complexity(ComplexityRequest {
        code,
        analysis_types: args.analysis_types.clone(),
        detail_level: args.detail,
    });
    let outcome = execute(found_config, &request, &interaction).await?;
    print_outcome(found_config, &outcome, &args.output).await
}

pub async fn optimize_root(found_config: &FoundConfig, args: &OptimizeArgs) -> Result<i32> {
    let interaction = InquireInteraction;
    let code = collect_code(&args.input, &interaction).await?;
    let request = ActionRequest::Optimization(OptimizationRequest {
        code,
        optimization_areas: args.optimization_areas.clone(),
        priority_level: args.priority,
        include_examples: !args.no_examples,
    });
    let outcome = execute(found_config, &request, &interaction).await?;
    print_outcome(found_config, &outcome, &args.output).await
}

pub async fn docs_root(found_config: &FoundConfig, args: &DocsArgs) -> Result<i32> {
    let interaction = InquireInteraction;
    let code = collect_code(&args.input, &interaction).await?;
    let request = ActionRequest::Documentation(DocumentationRequest {
        code,
        doc_types: args.doc_types.clone(),
        output_format: args.format,
        include_diagrams: args.diagrams,
    });
    let outcome = execute(found_config, &request, &interaction).await?;

    if let (true, ActionOutcome::Completed { raw, .. }) = (args.save, &outcome) {
        let path = found_config
            .working_dir
            .join(args.format.download_file_name());
        tokio::fs::write(&path, raw).await?;
        info!(target: "always", "Documentation saved to {}", path.display());
    }

    print_outcome(found_config, &outcome, &args.output).await
}

pub async fn migrate_root(found_config: &FoundConfig, args: &MigrateArgs) -> Result<i32> {
    let interaction = InquireInteraction;
    let code = collect_code(&args.input, &interaction).await?;
    let request = ActionRequest::Migration(MigrationRequest {
        code,
        migration_areas: args.migration_areas.clone(),
        target_platform: args.target,
        include_examples: !args.no_examples,
    });
    let outcome = execute(found_config, &request, &interaction).await?;
    print_outcome(found_config, &outcome, &args.output).await
}

async fn collect_code(input: &InputArgs, interaction: &dyn UserInteraction) -> Result<String> {
    let source = match (&input.code, &input.location) {
        (Some(code), _) => InputSource::Text(code.clone()),
        (None, Some(location)) => InputSource::from_location(location),
        (None, None) => InputSource::Text(String::new()),
    };
    debug!("Collecting input from {:?}", source);

    let collected = source.collect(interaction).await;
    if input.preview && !collected.text.is_empty() {
        report_stdout!("{}", highlight_code_sections(&collected.preview(), "xml"));
    }

    Ok(collected.text)
}

/// Use the configured key, or ask for one when running interactively.
fn resolve_credential(
    found_config: &FoundConfig,
    interaction: &dyn UserInteraction,
) -> Option<SecretString> {
    if let Some(key) = &found_config.api_key {
        use secrecy::ExposeSecret;
        return Some(SecretString::from(key.expose_secret().to_string()));
    }

    interaction
        .ask_secret(
            "Groq API Key",
            Some("Get your API key from https://console.groq.com"),
        )
        .map(SecretString::from)
}

async fn execute(
    found_config: &FoundConfig,
    request: &ActionRequest,
    interaction: &dyn UserInteraction,
) -> Result<ActionOutcome> {
    let Some(credential) = resolve_credential(found_config, interaction) else {
        let outcome = ActionOutcome::Invalid(ValidationError::MissingCredential);
        report_outcome(&outcome);
        return Ok(outcome);
    };

    let client = CLIENT_CACHE.get_or_try_insert_with(&credential, || {
        let client: Arc<dyn CompletionProvider> =
            Arc::new(GroqClient::new(&credential, &found_config.base_url)?);
        Ok::<_, CompletionError>(client)
    })?;

    let assistant = Assistant::new(
        client,
        &found_config.templates,
        found_config.model,
        interaction,
    );

    let kind = request.kind();
    let span = info_span!("completion", "indicatif.pb_show" = true);
    span.pb_set_style(&progress_bar_without_pos());
    span.pb_set_message(&format!(
        "{} using {}...",
        kind.progress_message(),
        assistant.model()
    ));
    info!(target: "progress", "{} using {}...", kind.progress_message(), assistant.model());

    let outcome = run_action(&assistant, request).instrument(span).await;
    report_outcome(&outcome);
    Ok(outcome)
}

async fn print_outcome(
    found_config: &FoundConfig,
    outcome: &ActionOutcome,
    output: &OutputArgs,
) -> Result<i32> {
    if let ActionOutcome::Completed {
        kind,
        raw,
        formatted,
    } = outcome
    {
        if let Some(path) = &output.output {
            let path = found_config.working_dir.join(path);
            tokio::fs::write(&path, raw).await?;
            info!(target: "always", "Result written to {}", path.display());
        }

        if output.raw {
            report_stdout!("{}", raw);
        } else {
            report_stdout!("## {}\n", kind.result_heading());
            report_stdout!("{}", formatted);
        }
    }

    Ok(outcome.to_exit_code())
}
