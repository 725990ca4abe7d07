use predicates::prelude::*;

mod common;
use common::*;

#[test]
fn test_version_short() {
    let helper = AssistTestHelper::new("version", "simple-process");
    let results = helper.run_command(&["version", "--short"]);

    results
        .success()
        .stdout(predicate::str::starts_with("tibco-assist "));

    helper.clean_work_dir();
}

#[test]
fn test_models_lists_every_model() {
    let helper = AssistTestHelper::new("models", "simple-process");
    let results = helper.run_command(&["models", "--model", "llama-3.1-8b-instant"]);

    results
        .success()
        .stdout(predicate::str::is_match(r"- llama-3\.3-70b-versatile\s+default").unwrap())
        .stdout(predicate::str::is_match(r"- llama-3\.1-8b-instant\s+selected").unwrap())
        .stdout(predicate::str::contains("- llama-3.1-70b-versatile"))
        .stdout(predicate::str::contains("- mixtral-8x7b-32768"));

    helper.clean_work_dir();
}

#[test]
fn test_templates_are_built_in_by_default() {
    let helper = AssistTestHelper::new("templates-default", "simple-process");
    let results = helper.run_command(&["templates", "--disable-default-config"]);

    results
        .success()
        .stdout(predicate::str::contains("- test-cases"))
        .stdout(predicate::str::contains("- complexity-chunk"))
        .stdout(predicate::str::contains(".tibco-assist").not());

    helper.clean_work_dir();
}

#[test]
fn test_templates_show_overrides() {
    let helper = AssistTestHelper::new("templates-override", "custom-templates");
    let results = helper.run_command(&["templates"]);

    results
        .success()
        .stdout(
            predicate::str::is_match(r"- complexity\s+0\.2\s+4000\s+\.tibco-assist/prompts\.yaml")
                .unwrap(),
        )
        .stdout(predicate::str::is_match(r"- optimization\s+0\.2\s+4000\s+built-in").unwrap())
        .stderr(predicate::str::contains("Unknown template"));

    helper.clean_work_dir();
}
