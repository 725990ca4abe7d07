use super::error::AssistError;
use crate::internal::interaction::UserInteraction;
use crate::shared::choices::*;
use crate::shared::completion::{ChatMessage, CompletionProvider, CompletionRequestBuilder};
use crate::shared::templates::{PromptKind, PromptTemplates};
use minijinja::{Value, context};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns action options into a single completion request.
///
/// Every operation returns `None` when anything goes wrong. The cause is
/// reported through the [`UserInteraction`] before returning.
pub struct Assistant<'a> {
    client: Arc<dyn CompletionProvider>,
    templates: &'a PromptTemplates,
    model: ModelChoice,
    interaction: &'a dyn UserInteraction,
}

impl<'a> Assistant<'a> {
    pub fn new(
        client: Arc<dyn CompletionProvider>,
        templates: &'a PromptTemplates,
        model: ModelChoice,
        interaction: &'a dyn UserInteraction,
    ) -> Self {
        Self {
            client,
            templates,
            model,
            interaction,
        }
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub async fn generate_test_cases(
        &self,
        code: &str,
        test_types: &[TestType],
        complexity_level: ComplexityLevel,
    ) -> Option<String> {
        self.complete(
            PromptKind::TestCases,
            context! {
                code => code,
                test_types => join_labels(test_types),
                complexity_level => complexity_level.to_string(),
            },
        )
        .await
    }

    pub async fn analyze_complexity(
        &self,
        code: &str,
        analysis_types: &[AnalysisFocus],
        detail_level: DetailLevel,
    ) -> Option<String> {
        self.complete(
            PromptKind::Complexity,
            context! {
                code => code,
                analysis_types => join_labels(analysis_types),
                detail_level => detail_level.to_string(),
            },
        )
        .await
    }

    pub async fn optimize_process(
        &self,
        code: &str,
        optimization_areas: &[OptimizationArea],
        priority_level: PriorityLevel,
        include_examples: bool,
    ) -> Option<String> {
        self.complete(
            PromptKind::Optimization,
            context! {
                code => code,
                optimization_areas => join_labels(optimization_areas),
                priority_level => priority_level.to_string(),
                include_examples => include_examples,
            },
        )
        .await
    }

    pub async fn generate_documentation(
        &self,
        code: &str,
        doc_types: &[DocType],
        output_format: OutputFormat,
        include_diagrams: bool,
    ) -> Option<String> {
        self.complete(
            PromptKind::Documentation,
            context! {
                code => code,
                doc_types => join_labels(doc_types),
                output_format => output_format.to_string(),
                include_diagrams => include_diagrams,
            },
        )
        .await
    }

    pub async fn analyze_migration(
        &self,
        code: &str,
        migration_areas: &[MigrationArea],
        target_platform: MigrationTarget,
        include_examples: bool,
    ) -> Option<String> {
        self.complete(
            PromptKind::Migration,
            context! {
                code => code,
                migration_areas => join_labels(migration_areas),
                target_platform => target_platform.to_string(),
                include_examples => include_examples,
            },
        )
        .await
    }

    /// Test cases for one piece of a larger process.
    ///
    /// `chunk_prompt` already describes the chunk and embeds its text.
    pub async fn generate_test_cases_for_chunk(
        &self,
        chunk_prompt: &str,
        test_types: &[TestType],
        complexity_level: ComplexityLevel,
    ) -> Option<String> {
        self.complete(
            PromptKind::TestCasesChunk,
            context! {
                chunk_prompt => chunk_prompt,
                test_types => join_labels(test_types),
                complexity_level => complexity_level.to_string(),
            },
        )
        .await
    }

    pub async fn analyze_complexity_for_chunk(
        &self,
        chunk_prompt: &str,
        analysis_types: &[AnalysisFocus],
        detail_level: DetailLevel,
    ) -> Option<String> {
        self.complete(
            PromptKind::ComplexityChunk,
            context! {
                chunk_prompt => chunk_prompt,
                analysis_types => join_labels(analysis_types),
                detail_level => detail_level.to_string(),
            },
        )
        .await
    }

    async fn complete(&self, kind: PromptKind, ctx: Value) -> Option<String> {
        match self.try_complete(kind, ctx).await {
            Ok(text) => Some(text),
            Err(e) => {
                self.interaction
                    .error(&format!("Completion service error: {}", e));
                None
            }
        }
    }

    #[instrument(skip(self, ctx), fields(model = %self.model))]
    async fn try_complete(&self, kind: PromptKind, ctx: Value) -> Result<String, AssistError> {
        let prompt = self.templates.render(kind, ctx)?;
        let request = CompletionRequestBuilder::default()
            .model(self.model.to_string())
            .messages(vec![
                ChatMessage::system(prompt.system),
                ChatMessage::user(prompt.user),
            ])
            .temperature(kind.temperature())
            .max_tokens(kind.max_tokens())
            .build()?;

        debug!(
            "Sending {} prompt ({} characters) with temperature {} and max_tokens {}",
            kind,
            request.messages[1].content.len(),
            request.temperature,
            request.max_tokens
        );
        let text = self.client.complete(&request).await?;
        info!("Received {} characters for {}", text.len(), kind);
        Ok(text)
    }
}
