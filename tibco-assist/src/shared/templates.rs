//! Prompt templates for every kind of completion request.
//!
//! Each kind has a system (role) instruction and a minijinja template for
//! the user message. Built-in templates can be replaced from configuration,
//! see [`PromptTemplates::override_template`].

use minijinja::{Environment, Value};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{name}' is invalid. {error}")]
    Invalid {
        name: String,
        #[source]
        error: minijinja::Error,
    },
    #[error("Unable to render template '{name}'. {error}")]
    Render {
        name: String,
        #[source]
        error: minijinja::Error,
    },
}

/// The request kinds a template exists for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PromptKind {
    TestCases,
    Complexity,
    Optimization,
    Documentation,
    Migration,
    TestCasesChunk,
    ComplexityChunk,
}

impl PromptKind {
    pub fn temperature(&self) -> f32 {
        match self {
            PromptKind::TestCases | PromptKind::Documentation | PromptKind::TestCasesChunk => 0.3,
            PromptKind::Complexity
            | PromptKind::Optimization
            | PromptKind::Migration
            | PromptKind::ComplexityChunk => 0.2,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            PromptKind::TestCasesChunk | PromptKind::ComplexityChunk => 3000,
            _ => 4000,
        }
    }

    fn template_name(&self) -> String {
        format!("{}.prompt", self)
    }

    fn builtin_system(&self) -> &'static str {
        match self {
            PromptKind::TestCases => {
                "You are an expert TIBCO BusinessWorks developer specializing in comprehensive test case generation."
            }
            PromptKind::Complexity => {
                "You are an expert TIBCO BusinessWorks architect specializing in code analysis and complexity assessment."
            }
            PromptKind::Optimization => {
                "You are an expert TIBCO BusinessWorks performance engineer specializing in process optimization and tuning."
            }
            PromptKind::Documentation => {
                "You are an expert TIBCO BusinessWorks technical writer specializing in clear, accurate integration documentation."
            }
            PromptKind::Migration => {
                "You are an expert TIBCO integration architect specializing in platform upgrades and migrations."
            }
            PromptKind::TestCasesChunk => {
                "You are an expert TIBCO BusinessWorks developer specializing in test case generation for code chunks."
            }
            PromptKind::ComplexityChunk => {
                "You are an expert TIBCO BusinessWorks architect specializing in code complexity analysis for large files."
            }
        }
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            PromptKind::TestCases => TEST_CASES_TEMPLATE,
            PromptKind::Complexity => COMPLEXITY_TEMPLATE,
            PromptKind::Optimization => OPTIMIZATION_TEMPLATE,
            PromptKind::Documentation => DOCUMENTATION_TEMPLATE,
            PromptKind::Migration => MIGRATION_TEMPLATE,
            PromptKind::TestCasesChunk => TEST_CASES_CHUNK_TEMPLATE,
            PromptKind::ComplexityChunk => COMPLEXITY_CHUNK_TEMPLATE,
        }
    }
}

/// Where the template for a kind was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    BuiltIn,
    File(String),
}

/// System instruction and user message, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    env: Environment<'static>,
    systems: BTreeMap<PromptKind, String>,
    origins: BTreeMap<PromptKind, TemplateOrigin>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let mut env = Environment::new();
        let mut systems = BTreeMap::new();
        let mut origins = BTreeMap::new();

        for kind in PromptKind::iter() {
            env.add_template_owned(kind.template_name(), kind.builtin_template())
                .expect("built-in templates to be valid");
            systems.insert(kind, kind.builtin_system().to_string());
            origins.insert(kind, TemplateOrigin::BuiltIn);
        }

        Self {
            env,
            systems,
            origins,
        }
    }
}

impl PromptTemplates {
    /// Replace the template (and optionally the system instruction) for a kind.
    ///
    /// The template is compiled right away, an invalid one leaves the
    /// previous template in place.
    pub fn override_template(
        &mut self,
        kind: PromptKind,
        system: Option<String>,
        template: String,
        origin: TemplateOrigin,
    ) -> Result<(), TemplateError> {
        let name = kind.template_name();
        let mut candidate = self.env.clone();
        candidate
            .add_template_owned(name.clone(), template)
            .map_err(|error| TemplateError::Invalid { name, error })?;

        self.env = candidate;
        if let Some(system) = system {
            self.systems.insert(kind, system);
        }
        self.origins.insert(kind, origin);
        Ok(())
    }

    pub fn origin(&self, kind: PromptKind) -> TemplateOrigin {
        self.origins
            .get(&kind)
            .cloned()
            .unwrap_or(TemplateOrigin::BuiltIn)
    }

    pub fn render(&self, kind: PromptKind, ctx: Value) -> Result<RenderedPrompt, TemplateError> {
        let name = kind.template_name();
        let template = self
            .env
            .get_template(&name)
            .map_err(|error| TemplateError::Render {
                name: name.clone(),
                error,
            })?;
        let user = template
            .render(ctx)
            .map_err(|error| TemplateError::Render { name, error })?;

        let system = self
            .systems
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.builtin_system().to_string());

        Ok(RenderedPrompt { system, user })
    }
}

const TEST_CASES_TEMPLATE: &str = r#"You are an expert TIBCO BusinessWorks developer and test engineer. Analyze the following TIBCO code/XML and generate comprehensive test cases.

TIBCO Code/XML:
{{ code }}

Test Requirements:
- Test Types: {{ test_types }}
- Complexity Level: {{ complexity_level }}

Please provide:
1. **Test Case Overview** - Brief summary of the process being tested
2. **Input Data Sets** - Specific input values for each test scenario
3. **Expected Results** - What the expected output should be for each input
4. **Test Steps** - Detailed steps to execute each test
5. **Edge Cases** - Boundary conditions and edge scenarios
6. **Error Scenarios** - Invalid inputs and error handling tests
7. **Validation Points** - Key checkpoints to verify during testing

Format the response in clear sections with bullet points and code examples where applicable.
Focus on TIBCO BusinessWorks specific testing patterns and best practices.
"#;

const COMPLEXITY_TEMPLATE: &str = r#"You are an expert TIBCO BusinessWorks architect and code reviewer. Analyze the following TIBCO code/XML for complexity, patterns, and potential issues.

TIBCO Code/XML:
{{ code }}

Analysis Requirements:
- Analysis Areas: {{ analysis_types }}
- Detail Level: {{ detail_level }}

Please provide a comprehensive analysis covering:

1. **Complexity Metrics**
   - Cyclomatic complexity score
   - Nesting levels and depth
   - Number of decision points

2. **Architecture Analysis**
   - Process flow complexity
   - Component interactions
   - Data transformation complexity

3. **Dependency Analysis**
   - External dependencies
   - Coupling between components
   - Resource dependencies

4. **Anti-pattern Detection**
   - Common TIBCO anti-patterns
   - Code smells specific to BusinessWorks
   - Maintainability issues

5. **Performance Implications**
   - Potential bottlenecks
   - Memory usage concerns
   - Processing efficiency

6. **Recommendations**
   - Refactoring suggestions
   - Best practice improvements
   - Optimization opportunities

7. **Risk Assessment**
   - Maintainability score (1-10)
   - Complexity rating (Low/Medium/High)
   - Priority areas for improvement

Format the response with clear sections, metrics, and actionable recommendations.
Use TIBCO BusinessWorks terminology and best practices throughout.
"#;

const OPTIMIZATION_TEMPLATE: &str = r#"You are an expert TIBCO BusinessWorks performance engineer. Review the following TIBCO code/XML and recommend concrete optimizations.

TIBCO Code/XML:
{{ code }}

Optimization Requirements:
- Focus Areas: {{ optimization_areas }}
- Priority: {{ priority_level }}
- Include Code Examples: {{ "Yes" if include_examples else "No" }}

Please provide:
1. **Current State Assessment** - Summary of how the process behaves today
2. **Performance Optimizations** - Activity, mapping and XPath changes that reduce latency
3. **Resource Optimizations** - Memory, thread pool, connection and shared resource tuning
4. **Error Handling Improvements** - Catch, fault and retry patterns that make the process more robust
5. **Structural Refactoring** - Sub-process extraction, reuse and simplification opportunities
6. **Implementation Roadmap** - Ordered steps, separating quick wins from long-term work
7. **Expected Impact** - Estimated benefit and risk level (LOW/MEDIUM/HIGH) for each recommendation
{% if include_examples %}
For each recommendation, show the relevant configuration or code before and after the change.
{% endif %}
Focus on TIBCO BusinessWorks specific tuning options and best practices.
"#;

const DOCUMENTATION_TEMPLATE: &str = r#"You are an expert TIBCO BusinessWorks technical writer. Produce documentation for the following TIBCO code/XML.

TIBCO Code/XML:
{{ code }}

Documentation Requirements:
- Document Types: {{ doc_types }}
- Output Format: {{ output_format }}
- Include Diagrams: {{ "Yes" if include_diagrams else "No" }}

Please provide:
1. **Process Overview** - Purpose of the process and where it fits in the integration landscape
2. **Process Flow** - Step-by-step description of every activity and transition
3. **Inputs and Outputs** - Schemas, parameters and their meaning
4. **Data Mappings** - Key transformations and XPath expressions
5. **Error Handling** - Faults raised, catch blocks and recovery behaviour
6. **Dependencies** - Shared resources, sub-processes, adapters and external systems
7. **Configuration and Deployment** - Global variables, properties and deployment notes
{% if include_diagrams %}
Include a diagram of the process flow as text (Mermaid for Markdown, ASCII art otherwise).
{% endif %}
Format the entire response as {{ output_format }}.
Use TIBCO BusinessWorks terminology throughout.
"#;

const MIGRATION_TEMPLATE: &str = r#"You are an expert TIBCO integration architect. Assess the following TIBCO code/XML for migration.

TIBCO Code/XML:
{{ code }}

Migration Requirements:
- Migration Areas: {{ migration_areas }}
- Target Platform: {{ target_platform }}
- Include Code Examples: {{ "Yes" if include_examples else "No" }}

Please provide:
1. **Current State Analysis** - Version-specific features and palettes in use
2. **Compatibility Assessment** - Activities and resources that do not carry over to {{ target_platform }}
3. **Component Mapping** - Equivalent components on the target platform
4. **Migration Strategy** - Recommended approach and sequencing
5. **Risk Assessment** - Risk level (LOW/MEDIUM/HIGH/CRITICAL) per area with mitigations
6. **Effort Estimation** - Complexity rating (Low/Medium/High) and relative effort per component
7. **Migration Plan** - Step-by-step plan including rollback points
8. **Testing and Validation** - How to verify behaviour is unchanged after migration
{% if include_examples %}
Show migrated configuration or code for the most important components.
{% endif %}
Use TIBCO terminology and current migration best practices.
"#;

const TEST_CASES_CHUNK_TEMPLATE: &str = r#"{{ chunk_prompt }}

Test Requirements:
- Test Types: {{ test_types }}
- Complexity Level: {{ complexity_level }}

Please provide test cases for the components in this chunk:
1. **Chunk Analysis** - What components/logic are present in this chunk
2. **Test Scenarios** - Specific test cases for this chunk's functionality
3. **Input Data** - Required inputs for testing this chunk
4. **Expected Results** - Expected outputs from this chunk
5. **Integration Points** - How this chunk connects to other parts

Format concisely but thoroughly. Focus on TIBCO BusinessWorks patterns.
"#;

const COMPLEXITY_CHUNK_TEMPLATE: &str = r#"{{ chunk_prompt }}

Analysis Requirements:
- Analysis Areas: {{ analysis_types }}
- Detail Level: {{ detail_level }}

Please analyze this chunk covering:
1. **Chunk Complexity** - Complexity metrics for this specific chunk
2. **Local Dependencies** - Dependencies within this chunk
3. **Component Analysis** - TIBCO components and their complexity
4. **Chunk-specific Issues** - Problems identified in this chunk
5. **Integration Impact** - How this chunk affects overall process complexity

Be concise but thorough. Focus on actionable insights.
"#;
