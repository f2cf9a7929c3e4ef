//! Field-list contract types: the model receives the contract type and a
//! list of `field: value` lines and drafts the whole document itself.

use crate::models::{ContractTypeDefinition, FieldDefinition};

pub fn definitions() -> Vec<ContractTypeDefinition> {
    vec![employment_contract(), nda(), service_agreement()]
}

fn employment_contract() -> ContractTypeDefinition {
    ContractTypeDefinition::field_list(
        "Employment Contract",
        vec![
            FieldDefinition::text("Employee Name"),
            FieldDefinition::text("Job Title"),
            FieldDefinition::date("Start Date"),
            FieldDefinition::text("Salary"),
            FieldDefinition::long_text("Benefits"),
        ],
    )
    .with_description("Employment terms for a single hire")
}

fn nda() -> ContractTypeDefinition {
    ContractTypeDefinition::field_list(
        "Non-Disclosure Agreement (NDA)",
        vec![
            FieldDefinition::text("Parties Involved"),
            FieldDefinition::long_text("Confidential Information"),
            FieldDefinition::text("Term"),
        ],
    )
    .with_description("Mutual or one-way confidentiality agreement")
}

fn service_agreement() -> ContractTypeDefinition {
    ContractTypeDefinition::field_list(
        "Service Agreement",
        vec![
            FieldDefinition::text("Client Name"),
            FieldDefinition::text("Client Address"),
            FieldDefinition::text("Service Provider"),
            FieldDefinition::text("Service Provider Address"),
            FieldDefinition::date("Start Date"),
            FieldDefinition::date("End Date"),
            FieldDefinition::long_text("Scope of Work"),
            FieldDefinition::long_text("Payment Terms"),
        ],
    )
    .with_description("Services delivered by a provider to a client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldKind, PromptStyle};

    #[test]
    fn test_brief_definitions_are_field_lists() {
        for def in definitions() {
            assert_eq!(def.style, PromptStyle::FieldList, "{}", def.id);
            assert!(def.template.is_empty());
        }
    }

    #[test]
    fn test_employment_contract_field_order() {
        let def = employment_contract();
        let labels: Vec<&str> = def.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Employee Name", "Job Title", "Start Date", "Salary", "Benefits"]
        );
        assert_eq!(def.field("start_date").unwrap().kind, FieldKind::Date);
    }
}
