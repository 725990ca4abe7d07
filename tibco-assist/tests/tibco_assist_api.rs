use std::sync::Arc;
use tibco_assist::Silent;
use tibco_assist::assist::options::{ActionRequest, DocumentationRequest, MigrationRequest};
use tibco_assist::assist::{ActionKind, ActionOutcome, Assistant, run_action};
use tibco_assist::shared::choices::*;
use tibco_assist::shared::prelude::{
    CompletionError, MockCompletionProvider, PromptTemplates, Role,
};

fn documentation_request(code: &str) -> ActionRequest {
    ActionRequest::Documentation(DocumentationRequest {
        code: code.to_string(),
        doc_types: vec![DocType::ProcessOverview, DocType::DataMappings],
        output_format: OutputFormat::Html,
        include_diagrams: true,
    })
}

#[tokio::test]
async fn test_documentation_request_reaches_the_provider() {
    let mut client = MockCompletionProvider::new();
    client
        .expect_complete()
        .withf(|request| {
            let user = &request.messages[1];
            request.model == "mixtral-8x7b-32768"
                && request.max_tokens == 4000
                && request.messages[0].role == Role::System
                && user.role == Role::User
                && user.content.contains("<pd:ProcessDefinition/>")
                && user.content.contains("Process Overview, Data Mappings")
                && user.content.contains("Format the entire response as HTML.")
        })
        .times(1)
        .returning(|_| Ok("1. Overview\nThe process publishes orders.".to_string()));

    let templates = PromptTemplates::default();
    let interaction = Silent;
    let assistant = Assistant::new(
        Arc::new(client),
        &templates,
        ModelChoice::Mixtral8x7b,
        &interaction,
    );

    let outcome = run_action(&assistant, &documentation_request("<pd:ProcessDefinition/>")).await;

    match outcome {
        ActionOutcome::Completed {
            kind,
            raw,
            formatted,
        } => {
            assert_eq!(ActionKind::Documentation, kind);
            assert_eq!("1. Overview\nThe process publishes orders.", raw);
            assert!(formatted.contains("The process publishes orders."));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_provider_errors_become_failed_outcomes() {
    let mut client = MockCompletionProvider::new();
    client.expect_complete().times(1).returning(|_| {
        Err(CompletionError::Quota {
            body: "rate limit reached".to_string(),
        })
    });

    let templates = PromptTemplates::default();
    let interaction = Silent;
    let assistant = Assistant::new(
        Arc::new(client),
        &templates,
        ModelChoice::default(),
        &interaction,
    );

    let request = ActionRequest::Migration(MigrationRequest {
        code: "<pd:ProcessDefinition/>".to_string(),
        migration_areas: MigrationArea::defaults(),
        target_platform: MigrationTarget::Bw6,
        include_examples: false,
    });

    let outcome = run_action(&assistant, &request).await;
    assert_eq!(ActionOutcome::Failed(ActionKind::Migration), outcome);
    assert_eq!(1, outcome.to_exit_code());
}

#[tokio::test]
async fn test_invalid_requests_never_reach_the_provider() {
    let mut client = MockCompletionProvider::new();
    client.expect_complete().never();

    let templates = PromptTemplates::default();
    let interaction = Silent;
    let assistant = Assistant::new(
        Arc::new(client),
        &templates,
        ModelChoice::default(),
        &interaction,
    );

    let outcome = run_action(&assistant, &documentation_request("  \n")).await;
    assert_eq!(2, outcome.to_exit_code());
}
