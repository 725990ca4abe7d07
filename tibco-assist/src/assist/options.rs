//! CLI-independent request types, one per action.
//!
//! ```rust
//! use tibco_assist::assist::options::{ActionRequest, TestCaseRequest};
//! use tibco_assist::shared::choices::{ComplexityLevel, TestType};
//!
//! let request = ActionRequest::TestCases(TestCaseRequest {
//!     code: "<pd:ProcessDefinition/>".to_string(),
//!     test_types: vec![TestType::HappyPath],
//!     complexity_level: ComplexityLevel::Basic,
//! });
//! assert!(request.validate().is_ok());
//! ```

use super::error::ValidationError;
use crate::shared::choices::*;

#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRequest {
    pub code: String,
    pub test_types: Vec<TestType>,
    pub complexity_level: ComplexityLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityRequest {
    pub code: String,
    pub analysis_types: Vec<AnalysisFocus>,
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRequest {
    pub code: String,
    pub optimization_areas: Vec<OptimizationArea>,
    pub priority_level: PriorityLevel,
    pub include_examples: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentationRequest {
    pub code: String,
    pub doc_types: Vec<DocType>,
    pub output_format: OutputFormat,
    pub include_diagrams: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRequest {
    pub code: String,
    pub migration_areas: Vec<MigrationArea>,
    pub target_platform: MigrationTarget,
    pub include_examples: bool,
}

/// A fully specified request for one of the five actions.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    TestCases(TestCaseRequest),
    Complexity(ComplexityRequest),
    Optimization(OptimizationRequest),
    Documentation(DocumentationRequest),
    Migration(MigrationRequest),
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::TestCases(_) => ActionKind::TestCases,
            ActionRequest::Complexity(_) => ActionKind::Complexity,
            ActionRequest::Optimization(_) => ActionKind::Optimization,
            ActionRequest::Documentation(_) => ActionKind::Documentation,
            ActionRequest::Migration(_) => ActionKind::Migration,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ActionRequest::TestCases(r) => &r.code,
            ActionRequest::Complexity(r) => &r.code,
            ActionRequest::Optimization(r) => &r.code,
            ActionRequest::Documentation(r) => &r.code,
            ActionRequest::Migration(r) => &r.code,
        }
    }

    pub fn selected_option_count(&self) -> usize {
        match self {
            ActionRequest::TestCases(r) => r.test_types.len(),
            ActionRequest::Complexity(r) => r.analysis_types.len(),
            ActionRequest::Optimization(r) => r.optimization_areas.len(),
            ActionRequest::Documentation(r) => r.doc_types.len(),
            ActionRequest::Migration(r) => r.migration_areas.len(),
        }
    }

    /// Input must be non-blank and at least one option must be selected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.kind();
        if self.code().trim().is_empty() {
            return Err(ValidationError::EmptyInput {
                message: kind.empty_input_message(),
            });
        }
        if self.selected_option_count() == 0 {
            return Err(ValidationError::NoOptionSelected {
                message: kind.empty_selection_message(),
            });
        }
        Ok(())
    }
}

/// The five actions, with the messages shown around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    TestCases,
    Complexity,
    Optimization,
    Documentation,
    Migration,
}

impl ActionKind {
    pub fn empty_input_message(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Please provide TIBCO code/XML to analyze",
            ActionKind::Complexity => "Please provide TIBCO code to analyze",
            ActionKind::Optimization => "Please provide TIBCO code to optimize",
            ActionKind::Documentation => "Please provide TIBCO code to document",
            ActionKind::Migration => "Please provide TIBCO code to assess for migration",
        }
    }

    pub fn empty_selection_message(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Please select at least one test scenario type",
            ActionKind::Complexity => "Please select at least one analysis area",
            ActionKind::Optimization => "Please select at least one optimization area",
            ActionKind::Documentation => "Please select at least one documentation type",
            ActionKind::Migration => "Please select at least one migration area",
        }
    }

    /// Shown next to the spinner while the request is in flight.
    pub fn progress_message(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Generating test cases",
            ActionKind::Complexity => "Analyzing code complexity",
            ActionKind::Optimization => "Generating optimization recommendations",
            ActionKind::Documentation => "Generating documentation",
            ActionKind::Migration => "Analyzing migration path",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Test cases generated successfully!",
            ActionKind::Complexity => "Code analysis completed!",
            ActionKind::Optimization => "Optimization recommendations generated!",
            ActionKind::Documentation => "Documentation generated successfully!",
            ActionKind::Migration => "Migration analysis completed!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Failed to generate test cases. Please try again.",
            ActionKind::Complexity => "Failed to analyze code complexity. Please try again.",
            ActionKind::Optimization => {
                "Failed to generate optimization recommendations. Please try again."
            }
            ActionKind::Documentation => "Failed to generate documentation. Please try again.",
            ActionKind::Migration => "Failed to analyze migration path. Please try again.",
        }
    }

    pub fn result_heading(&self) -> &'static str {
        match self {
            ActionKind::TestCases => "Generated Test Cases",
            ActionKind::Complexity => "Complexity Analysis Results",
            ActionKind::Optimization => "Optimization Recommendations",
            ActionKind::Documentation => "Generated Documentation",
            ActionKind::Migration => "Migration Analysis",
        }
    }
}
