//! Integration tests for drafting: registry, prompt and generation retries

use contractdraft::core::{build_prompt, load_config, load_registry, GenerationClient, TemplateRegistry};
use contractdraft::models::ConfigOverrides;
use contractdraft::TemplateError;

mod common;

use common::{create_contract_file, create_test_project, ScriptedGenerator};

#[test]
fn test_employment_contract_prompt() {
    let registry = TemplateRegistry::builtin().unwrap();
    let def = registry.get("Employment Contract").unwrap();

    let mut request = def.request();
    def.set_value(&mut request, "Employee Name", "Jane Doe").unwrap();
    def.set_value(&mut request, "Job Title", "Engineer").unwrap();
    def.set_value(&mut request, "Start Date", "2024-01-01").unwrap();
    def.set_value(&mut request, "Salary", "90000").unwrap();
    def.set_value(&mut request, "Benefits", "None").unwrap();

    let prompt = build_prompt(def, &request).unwrap();

    let expected = [
        "Employee Name: Jane Doe",
        "Job Title: Engineer",
        "Start Date: 2024-01-01",
        "Salary: 90000",
        "Benefits: None",
    ];
    let positions: Vec<usize> = expected
        .iter()
        .map(|line| prompt.find(&format!("{}\n", line)).unwrap_or_else(|| panic!("missing {}", line)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "lines out of order:\n{}", prompt);
    assert!(prompt.starts_with("Draft a Professional Employment Contract"));

    // Same inputs, same prompt
    assert_eq!(prompt, build_prompt(def, &request.clone()).unwrap());
}

#[test]
fn test_template_contract_prompt() {
    let registry = TemplateRegistry::builtin().unwrap();
    let def = registry.get("employee-and-company").unwrap();

    let mut request = def.request();
    def.set_value(&mut request, "company", "Acme Ltd").unwrap();
    def.set_value(&mut request, "employee", "Jane Doe").unwrap();
    def.set_value(&mut request, "Payment Schedule", "weekly").unwrap();

    let prompt = build_prompt(def, &request).unwrap();
    assert!(prompt.contains("made between Acme Ltd (\"Company\") and Jane Doe (\"Employee\")"));
    assert!(prompt.contains("paid on a Weekly basis"));
    assert!(prompt.contains("following benefits: List of benefits provided by the company."));
    assert!(!prompt.contains('{'));
}

#[test]
fn test_user_defined_contract_type() {
    let (_temp_dir, project_root) = create_test_project();
    create_contract_file(
        &project_root,
        "lease.md",
        r#"
name: Residential Lease
style: template
fields:
  - label: Landlord
  - label: Tenant
  - label: Move In
    kind: date
"#,
        "{landlord} lets the flat to {tenant} from {move_in}.",
    );

    let config = load_config(&project_root, ConfigOverrides::default()).unwrap();
    let registry = load_registry(&project_root, &config).unwrap();
    let def = registry.get("residential-lease").unwrap();

    let mut request = def.request();
    def.set_value(&mut request, "landlord", "Ann").unwrap();
    def.set_value(&mut request, "tenant", "Bob").unwrap();
    def.set_value(&mut request, "move in", "2025-02-01").unwrap();

    assert_eq!(
        build_prompt(def, &request).unwrap(),
        "Ann lets the flat to Bob from 2025-02-01."
    );
}

#[test]
fn test_user_defined_contract_with_undefined_placeholder() {
    let (_temp_dir, project_root) = create_test_project();
    create_contract_file(
        &project_root,
        "lease.md",
        "name: Lease\nstyle: template\nfields:\n  - label: Landlord\n",
        "{landlord} under the laws of {governing_law}",
    );

    let config = load_config(&project_root, ConfigOverrides::default()).unwrap();
    let err = load_registry(&project_root, &config).unwrap_err();
    assert!(err.to_string().contains("governing_law"));
    assert!(matches!(
        err,
        contractdraft::DraftError::Template(TemplateError::UndefinedPlaceholder { .. })
    ));
}

#[tokio::test]
async fn test_three_failures_exhaust_three_attempts() {
    let client = GenerationClient::new(ScriptedGenerator::always_failing(), 3);

    let err = client.generate("Draft an NDA").await.unwrap_err();

    assert_eq!(err.attempts, 3);
    assert_eq!(client.generator().calls(), 3);
}

#[tokio::test]
async fn test_success_on_third_of_five_attempts() {
    let client = GenerationClient::new(ScriptedGenerator::failing_then(2, "OK"), 5);

    let text = client.generate("Draft an NDA").await.unwrap();

    assert_eq!(text, "OK");
    assert_eq!(client.generator().calls(), 3);
}

#[tokio::test]
async fn test_every_attempt_sends_the_same_prompt() {
    let registry = TemplateRegistry::builtin().unwrap();
    let def = registry.get("Non-Disclosure Agreement (NDA)").unwrap();
    let request = def
        .request()
        .with("parties_involved", "Acme and Globex")
        .with("term", "2 years");
    let prompt = build_prompt(def, &request).unwrap();

    let client = GenerationClient::new(ScriptedGenerator::failing_then(1, "NDA text"), 3);
    assert_eq!(client.generate(&prompt).await.unwrap(), "NDA text");

    let prompts = client.generator().prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts.iter().all(|p| p == &prompt));
}

#[tokio::test]
async fn test_max_attempts_from_config() {
    let (_temp_dir, project_root) = create_test_project();
    let config = load_config(&project_root, ConfigOverrides::default()).unwrap();
    assert_eq!(config.generation.max_attempts, 3);

    let client = GenerationClient::new(
        ScriptedGenerator::always_failing(),
        config.generation.max_attempts,
    );
    assert!(client.generate("p").await.is_err());
    assert_eq!(client.generator().calls(), 3);
}
