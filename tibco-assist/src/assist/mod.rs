mod api;
mod assistant;
mod cli;
mod error;
pub mod options;

pub mod prelude {
    pub use super::cli::{
        ComplexityArgs, DocsArgs, MigrateArgs, OptimizeArgs, TestCasesArgs, complexity_root,
        docs_root, migrate_root, optimize_root, test_cases_root,
    };
}

pub use api::{ActionOutcome, format_for, report_outcome, run_action};
pub use assistant::Assistant;
pub use error::{AssistError, ValidationError};
pub use options::{ActionKind, ActionRequest};
