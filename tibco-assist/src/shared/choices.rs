//! Option enumerations offered to the user for each action.
//!
//! The `Display` value of every variant is the label that gets interpolated
//! into a prompt, the clap value name is the kebab-case variant name.

use clap::ValueEnum;
use itertools::Itertools;
use std::fmt;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Join selected options the way they appear in a prompt.
pub fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|x| x.to_string()).join(", ")
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum, Display, EnumIter,
)]
pub enum ModelChoice {
    #[default]
    #[value(name = "llama-3.3-70b-versatile")]
    #[strum(to_string = "llama-3.3-70b-versatile")]
    Llama33Versatile,
    #[value(name = "llama-3.1-70b-versatile")]
    #[strum(to_string = "llama-3.1-70b-versatile")]
    Llama31Versatile,
    #[value(name = "llama-3.1-8b-instant")]
    #[strum(to_string = "llama-3.1-8b-instant")]
    Llama31Instant,
    #[value(name = "mixtral-8x7b-32768")]
    #[strum(to_string = "mixtral-8x7b-32768")]
    Mixtral8x7b,
}

impl ModelChoice {
    pub fn all() -> Vec<ModelChoice> {
        ModelChoice::iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Display, EnumIter)]
pub enum TestType {
    #[strum(to_string = "Happy Path Tests")]
    HappyPath,
    #[strum(to_string = "Edge Cases")]
    EdgeCases,
    #[strum(to_string = "Error Scenarios")]
    ErrorScenarios,
    #[strum(to_string = "Boundary Value Tests")]
    BoundaryValue,
    #[strum(to_string = "Integration Tests")]
    Integration,
    #[strum(to_string = "Performance Tests")]
    Performance,
}

impl TestType {
    pub fn defaults() -> Vec<TestType> {
        vec![
            TestType::HappyPath,
            TestType::EdgeCases,
            TestType::ErrorScenarios,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum ComplexityLevel {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Display, EnumIter)]
pub enum AnalysisFocus {
    #[strum(to_string = "Cyclomatic Complexity")]
    CyclomaticComplexity,
    #[strum(to_string = "Dependency Analysis")]
    Dependencies,
    #[strum(to_string = "Anti-pattern Detection")]
    AntiPatterns,
    #[strum(to_string = "Performance Issues")]
    Performance,
    #[strum(to_string = "Maintainability Score")]
    Maintainability,
    #[strum(to_string = "Security Concerns")]
    Security,
}

impl AnalysisFocus {
    pub fn defaults() -> Vec<AnalysisFocus> {
        vec![
            AnalysisFocus::CyclomaticComplexity,
            AnalysisFocus::Dependencies,
            AnalysisFocus::AntiPatterns,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum DetailLevel {
    Summary,
    #[default]
    Detailed,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Display, EnumIter)]
pub enum OptimizationArea {
    Performance,
    #[strum(to_string = "Memory Usage")]
    MemoryUsage,
    #[strum(to_string = "Error Handling")]
    ErrorHandling,
    #[strum(to_string = "Resource Management")]
    ResourceManagement,
    Scalability,
    #[strum(to_string = "Code Structure")]
    CodeStructure,
}

impl OptimizationArea {
    pub fn defaults() -> Vec<OptimizationArea> {
        vec![
            OptimizationArea::Performance,
            OptimizationArea::ErrorHandling,
            OptimizationArea::ResourceManagement,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum PriorityLevel {
    #[strum(to_string = "Quick Wins")]
    QuickWins,
    #[default]
    Balanced,
    #[strum(to_string = "Long-term Improvements")]
    LongTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Display, EnumIter)]
pub enum DocType {
    #[strum(to_string = "Process Overview")]
    ProcessOverview,
    #[strum(to_string = "Technical Specification")]
    TechnicalSpec,
    #[strum(to_string = "Data Mappings")]
    DataMappings,
    #[strum(to_string = "Error Handling Guide")]
    ErrorHandling,
    #[strum(to_string = "Deployment Guide")]
    Deployment,
    #[strum(to_string = "API Reference")]
    ApiReference,
}

impl DocType {
    pub fn defaults() -> Vec<DocType> {
        vec![DocType::ProcessOverview, DocType::TechnicalSpec]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum OutputFormat {
    #[default]
    Markdown,
    #[strum(to_string = "HTML")]
    Html,
    #[strum(to_string = "Plain Text")]
    PlainText,
    #[strum(to_string = "Confluence Wiki")]
    Confluence,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::PlainText => "txt",
            OutputFormat::Confluence => "wiki",
        }
    }

    /// File name offered when the generated documentation is saved.
    pub fn download_file_name(&self) -> String {
        format!("tibco_documentation.{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Display, EnumIter)]
pub enum MigrationArea {
    #[strum(to_string = "BW5 to BW6 Upgrade")]
    Bw5ToBw6,
    #[strum(to_string = "Container Readiness")]
    ContainerReadiness,
    #[strum(to_string = "Cloud Deployment")]
    CloudDeployment,
    #[strum(to_string = "Microservices Decomposition")]
    Microservices,
    #[strum(to_string = "API Modernization")]
    ApiModernization,
    #[strum(to_string = "Deprecated Components")]
    DeprecatedComponents,
}

impl MigrationArea {
    pub fn defaults() -> Vec<MigrationArea> {
        vec![
            MigrationArea::Bw5ToBw6,
            MigrationArea::ContainerReadiness,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum MigrationTarget {
    #[default]
    #[strum(to_string = "BusinessWorks 6.x")]
    Bw6,
    #[strum(to_string = "BusinessWorks Container Edition")]
    ContainerEdition,
    #[strum(to_string = "TIBCO Cloud Integration")]
    CloudIntegration,
    #[strum(to_string = "Spring Boot")]
    SpringBoot,
    #[strum(to_string = "Apache Camel")]
    ApacheCamel,
}
