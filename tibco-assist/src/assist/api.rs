//! Public API for running an action without the CLI.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use secrecy::SecretString;
//! use tibco_assist::assist::{run_action, Assistant, ActionOutcome};
//! use tibco_assist::assist::options::{ActionRequest, ComplexityRequest};
//! use tibco_assist::internal::LogInteraction;
//! use tibco_assist::shared::choices::{AnalysisFocus, DetailLevel, ModelChoice};
//! use tibco_assist::shared::prelude::{DEFAULT_BASE_URL, GroqClient, PromptTemplates};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let key = SecretString::from(std::env::var("GROQ_API_KEY")?);
//!     let client = Arc::new(GroqClient::new(&key, &DEFAULT_BASE_URL.parse()?)?);
//!     let templates = PromptTemplates::default();
//!     let interaction = LogInteraction;
//!     let assistant = Assistant::new(client, &templates, ModelChoice::default(), &interaction);
//!
//!     let request = ActionRequest::Complexity(ComplexityRequest {
//!         code: std::fs::read_to_string("Process.bwp")?,
//!         analysis_types: AnalysisFocus::defaults(),
//!         detail_level: DetailLevel::Detailed,
//!     });
//!
//!     if let ActionOutcome::Completed { formatted, .. } = run_action(&assistant, &request).await {
//!         println!("{}", formatted);
//!     }
//!     Ok(())
//! }
//! ```

use super::assistant::Assistant;
use super::error::ValidationError;
use super::options::{ActionKind, ActionRequest};
use crate::shared::format;
use tracing::{error, info};

/// What happened when an action was run.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Refused locally, nothing was sent.
    Invalid(ValidationError),
    /// The completion request failed, the cause was already reported.
    Failed(ActionKind),
    Completed {
        kind: ActionKind,
        raw: String,
        formatted: String,
    },
}

impl ActionOutcome {
    pub fn to_exit_code(&self) -> i32 {
        match self {
            ActionOutcome::Completed { .. } => 0,
            ActionOutcome::Failed(_) => 1,
            ActionOutcome::Invalid(_) => 2,
        }
    }
}

/// Print the status line for an outcome.
pub fn report_outcome(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Invalid(e) => error!(target: "always", "{}", e),
        ActionOutcome::Failed(kind) => error!(target: "always", "{}", kind.failure_message()),
        ActionOutcome::Completed { kind, .. } => {
            info!(target: "user", "{}", kind.success_message())
        }
    }
}

/// Validate `request`, then make exactly one completion call for it.
pub async fn run_action(assistant: &Assistant<'_>, request: &ActionRequest) -> ActionOutcome {
    if let Err(e) = request.validate() {
        return ActionOutcome::Invalid(e);
    }

    let kind = request.kind();
    let raw = match request {
        ActionRequest::TestCases(r) => {
            assistant
                .generate_test_cases(&r.code, &r.test_types, r.complexity_level)
                .await
        }
        ActionRequest::Complexity(r) => {
            assistant
                .analyze_complexity(&r.code, &r.analysis_types, r.detail_level)
                .await
        }
        ActionRequest::Optimization(r) => {
            assistant
                .optimize_process(
                    &r.code,
                    &r.optimization_areas,
                    r.priority_level,
                    r.include_examples,
                )
                .await
        }
        ActionRequest::Documentation(r) => {
            assistant
                .generate_documentation(
                    &r.code,
                    &r.doc_types,
                    r.output_format,
                    r.include_diagrams,
                )
                .await
        }
        ActionRequest::Migration(r) => {
            assistant
                .analyze_migration(
                    &r.code,
                    &r.migration_areas,
                    r.target_platform,
                    r.include_examples,
                )
                .await
        }
    };

    match raw.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => ActionOutcome::Completed {
            kind,
            formatted: format_for(kind, &raw),
            raw,
        },
        None => ActionOutcome::Failed(kind),
    }
}

/// Apply the display formatting that belongs to an action.
pub fn format_for(kind: ActionKind, raw: &str) -> String {
    match kind {
        ActionKind::TestCases => format::format_test_cases(raw),
        ActionKind::Complexity => format::format_complexity_analysis(raw),
        ActionKind::Optimization => format::format_optimization(raw),
        ActionKind::Documentation => format::format_documentation(raw),
        ActionKind::Migration => format::format_migration_analysis(raw),
    }
}
