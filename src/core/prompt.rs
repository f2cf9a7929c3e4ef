//! Prompt construction from a contract type and the values entered for it

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::error::TemplateError;
use crate::models::{ContractRequest, ContractTypeDefinition, FieldDefinition, PromptStyle};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"))
}

/// Placeholder keys referenced by a template, in order of first appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in placeholder_re().captures_iter(template) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Value a field contributes to the prompt: the entered value, else the
/// default, else an empty string
fn field_text(field: &FieldDefinition, request: &ContractRequest) -> String {
    match request.get(&field.key) {
        Some(value) => value.to_string(),
        None => field.default.clone().unwrap_or_default(),
    }
}

/// Build the prompt sent to the model.
///
/// The result depends only on `definition` and `request`.
pub fn build_prompt(
    definition: &ContractTypeDefinition,
    request: &ContractRequest,
) -> Result<String, TemplateError> {
    if let Some(unknown) = request
        .keys()
        .find(|key| !definition.fields.iter().any(|f| f.key == *key))
    {
        return Err(TemplateError::UnknownField {
            contract: definition.id.clone(),
            field: unknown.to_string(),
        });
    }

    match definition.style {
        PromptStyle::FieldList => Ok(build_field_list(definition, request)),
        PromptStyle::Template => render_template(definition, request),
    }
}

fn build_field_list(definition: &ContractTypeDefinition, request: &ContractRequest) -> String {
    let mut prompt = format!(
        "Draft a Professional {} with the following details:\n",
        definition.id
    );
    for field in &definition.fields {
        prompt.push_str(&format!("{}: {}\n", field.label, field_text(field, request)));
    }
    prompt
}

/// Substitute every `{key}` in the template with the matching field's value
pub fn render_template(
    definition: &ContractTypeDefinition,
    request: &ContractRequest,
) -> Result<String, TemplateError> {
    let re = placeholder_re();

    // Checked up front so the replacement closure cannot fail
    for key in placeholders(&definition.template) {
        if !definition.fields.iter().any(|f| f.key == key) {
            return Err(TemplateError::UndefinedPlaceholder {
                contract: definition.id.clone(),
                placeholder: key,
            });
        }
    }

    let rendered = re.replace_all(&definition.template, |caps: &Captures| {
        definition
            .fields
            .iter()
            .find(|f| f.key == caps[1])
            .map(|f| field_text(f, request))
            .unwrap_or_default()
    });

    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldDefinition;
    use chrono::NaiveDate;

    fn employment() -> ContractTypeDefinition {
        ContractTypeDefinition::field_list(
            "Employment Contract",
            vec![
                FieldDefinition::text("Employee Name"),
                FieldDefinition::text("Job Title"),
                FieldDefinition::date("Start Date"),
                FieldDefinition::text("Salary"),
            ],
        )
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let keys = placeholders("{b} and {a}, then {b} again; not {1x} or { a }");
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_field_list_prompt() {
        let def = employment();
        let request = def
            .request()
            .with("employee_name", "Jane Doe")
            .with("job_title", "Engineer")
            .with("start_date", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with("salary", "90000");

        let prompt = build_prompt(&def, &request).unwrap();
        assert_eq!(
            prompt,
            "Draft a Professional Employment Contract with the following details:\n\
             Employee Name: Jane Doe\n\
             Job Title: Engineer\n\
             Start Date: 2024-01-01\n\
             Salary: 90000\n"
        );
    }

    #[test]
    fn test_missing_values_use_default_then_empty() {
        let mut def = employment();
        def.fields[3] = FieldDefinition::text("Salary").with_default("TBD");
        let request = def.request().with("employee_name", "Jane Doe");

        let prompt = build_prompt(&def, &request).unwrap();
        assert!(prompt.contains("Job Title: \n"));
        assert!(prompt.contains("Salary: TBD\n"));
    }

    #[test]
    fn test_unknown_request_key_rejected() {
        let def = employment();
        let request = def.request().with("bonus", "lots");
        let err = build_prompt(&def, &request).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownField { .. }));
    }

    #[test]
    fn test_render_template() {
        let def = ContractTypeDefinition::template(
            "Lease",
            vec![
                FieldDefinition::text("Landlord"),
                FieldDefinition::text("Tenant"),
                FieldDefinition::number("Rent", Some(0), None).with_default("1000"),
            ],
            "{landlord} leases to {tenant} for {rent} per month. Signed, {landlord}.",
        );
        let request = def.request().with("landlord", "Ann").with("tenant", "Bob");

        let prompt = build_prompt(&def, &request).unwrap();
        assert_eq!(prompt, "Ann leases to Bob for 1000 per month. Signed, Ann.");
    }

    #[test]
    fn test_render_template_undefined_placeholder() {
        let def = ContractTypeDefinition::template(
            "Lease",
            vec![FieldDefinition::text("Landlord")],
            "{landlord} and {governing_law}",
        );
        let err = build_prompt(&def, &def.request()).unwrap_err();
        match err {
            TemplateError::UndefinedPlaceholder { placeholder, .. } => {
                assert_eq!(placeholder, "governing_law")
            }
            other => panic!("Expected UndefinedPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let def = employment();
        let request = def
            .request()
            .with("salary", "1")
            .with("employee_name", "A")
            .with("job_title", "B");
        let first = build_prompt(&def, &request).unwrap();
        let second = build_prompt(&def, &request.clone()).unwrap();
        assert_eq!(first, second);
    }
}
