//! Template contract types: field values are substituted into a fixed
//! agreement body that the model turns into a finished contract.

use crate::models::{ContractTypeDefinition, FieldDefinition};

pub fn definitions() -> Vec<ContractTypeDefinition> {
    vec![
        service_provider_vendor(),
        employee_company(),
        licensing_agreement(),
    ]
}

const CONFIDENTIALITY_MUTUAL: &str = "Both parties agree to keep all sensitive information confidential and not to disclose it to third parties without prior written consent.";

const CONFIDENTIALITY_EMPLOYEE: &str = "The Employee agrees to keep all sensitive information confidential and not to disclose it to third parties without prior written consent.";

pub const SERVICE_PROVIDER_VENDOR: &str = r#"generate the professional contract based on the template below
This Agreement ("Agreement") is made between {vendor} ("Vendor") and {service_provider} ("Service Provider"). The parties agree to the following terms:
1. **Tenure Period**: This Agreement shall commence on {start_date} and continue for a period of {tenure_period} months, ending on {end_date}.
2. **Services Provided**: The Service Provider agrees to provide the following services: {service}.
3. **Purpose**: The purpose of this Agreement is to {purpose}.
4. **Payment Terms**: The Vendor agrees to pay the Service Provider according to the following schedule: {payment_details}.
5. **Confidentiality**: {confidentiality}
6. **Termination**: {termination}
7. **Miscellaneous**: Any amendments or modifications to this Agreement must be in writing and signed by both parties.
IN WITNESS WHEREOF, the parties have executed this Agreement on the date first written above.
"#;

pub const EMPLOYEE_COMPANY: &str = r#"generate the professional contract based on the template below
This Employment Agreement ("Agreement") is made between {company} ("Company") and {employee} ("Employee"). The parties agree to the following terms:
1. **Position**: The Employee is hired as a {position}.
2. **Start Date**: The Employee's employment will commence on {start_date}.
3. **Salary**: The Employee will be compensated at a rate of {salary} per year, paid on a {payment_schedule} basis.
4. **Benefits**: The Employee is entitled to the following benefits: {benefits}.
5. **Confidentiality**: {confidentiality}
6. **Termination**: {termination}
7. **Miscellaneous**: Any amendments or modifications to this Agreement must be in writing and signed by both parties.
IN WITNESS WHEREOF, the parties have executed this Agreement on the date first written above.
"#;

pub const LICENSING_AGREEMENT: &str = r#"generate the professional contract based on the template below
This Licensing Agreement ("Agreement") is made by and between:
**Licensor:**
Name: {licensor_name}
Address: {licensor_address}
**Licensee:**
Name: {licensee_name}
Address: {licensee_address}
1. **Intellectual Property**: The Licensor grants the Licensee a license to use the following intellectual property: {intellectual_property_description}.
2. **License Grant**: The license is {exclusive_or_nonexclusive}, {territory} and for a period of {license_duration}.
3. **License Fee**: The Licensee agrees to pay the Licensor {license_fee} as follows: {payment_terms}.
4. **Purpose**: The purpose of this license is {license_purpose}.
5. **Confidentiality**: {confidentiality_clause}
6. **Term and Termination**: The Agreement will commence on {start_date} and continue until {end_date} or until terminated by either party as per the terms: {termination_conditions}.
7. **Governing Law**: This Agreement will be governed by the laws of {governing_law}.
8. **Miscellaneous**: Any amendments or modifications to this Agreement must be in writing and signed by both parties.
IN WITNESS WHEREOF, the parties have executed this Agreement as of the date first above written.
"#;

fn service_provider_vendor() -> ContractTypeDefinition {
    ContractTypeDefinition::template(
        "Service Provider and Vendor",
        vec![
            FieldDefinition::text("Vendor"),
            FieldDefinition::text("Service Provider"),
            FieldDefinition::number("Tenure Period in months", Some(1), Some(100))
                .with_key("tenure_period")
                .with_default("5"),
            FieldDefinition::text("Service"),
            FieldDefinition::text("Purpose"),
            FieldDefinition::long_text("Payment Details").with_default(
                "Upon 50% completion of the project, an amount of 60% from the agreed amount \
                 will be paid, and on 100% completion of the project, the remaining amount will be paid.",
            ),
            FieldDefinition::date("Project Start Date").with_key("start_date"),
            FieldDefinition::date("Project End Date").with_key("end_date"),
            FieldDefinition::long_text("Confidentiality Clause")
                .with_key("confidentiality")
                .with_default(CONFIDENTIALITY_MUTUAL),
            FieldDefinition::long_text("Termination Clause")
                .with_key("termination")
                .with_default(
                    "Either party may terminate this Agreement by providing 30 days' written notice. \
                     Upon termination, all outstanding payments for services rendered will be due immediately.",
                ),
        ],
        SERVICE_PROVIDER_VENDOR,
    )
    .with_description("Project engagement between a vendor and a service provider")
}

fn employee_company() -> ContractTypeDefinition {
    ContractTypeDefinition::template(
        "Employee and Company",
        vec![
            FieldDefinition::text("Company"),
            FieldDefinition::text("Employee"),
            FieldDefinition::text("Position"),
            FieldDefinition::date("Start Date"),
            FieldDefinition::text("Salary"),
            FieldDefinition::choice("Payment Schedule", &["Monthly", "Bi-Weekly", "Weekly"])
                .with_default("Monthly"),
            FieldDefinition::long_text("Benefits")
                .with_default("List of benefits provided by the company."),
            FieldDefinition::long_text("Confidentiality Clause")
                .with_key("confidentiality")
                .with_default(CONFIDENTIALITY_EMPLOYEE),
            FieldDefinition::long_text("Termination Clause")
                .with_key("termination")
                .with_default("Either party may terminate this Agreement by providing 30 days' written notice."),
        ],
        EMPLOYEE_COMPANY,
    )
    .with_description("Employment agreement between a company and an employee")
}

fn licensing_agreement() -> ContractTypeDefinition {
    ContractTypeDefinition::template(
        "Licensing Agreement",
        vec![
            FieldDefinition::text("Licensor's Name").with_key("licensor_name"),
            FieldDefinition::text("Licensor's Address").with_key("licensor_address"),
            FieldDefinition::text("Licensee's Name").with_key("licensee_name"),
            FieldDefinition::text("Licensee's Address").with_key("licensee_address"),
            FieldDefinition::long_text("Description of Intellectual Property")
                .with_key("intellectual_property_description"),
            FieldDefinition::text("Exclusive or Non-exclusive License")
                .with_key("exclusive_or_nonexclusive"),
            FieldDefinition::text("Territory"),
            FieldDefinition::text("License Duration"),
            FieldDefinition::text("License Fee"),
            FieldDefinition::long_text("Payment Terms"),
            FieldDefinition::text("Purpose of License").with_key("license_purpose"),
            FieldDefinition::long_text("Confidentiality Clause"),
            FieldDefinition::date("Start Date"),
            FieldDefinition::date("End Date"),
            FieldDefinition::long_text("Termination Conditions"),
            FieldDefinition::text("Governing Law"),
        ],
        LICENSING_AGREEMENT,
    )
    .with_description("License of intellectual property from licensor to licensee")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::placeholders;

    #[test]
    fn test_every_placeholder_has_a_field() {
        for def in definitions() {
            for placeholder in placeholders(&def.template) {
                assert!(
                    def.fields.iter().any(|f| f.key == placeholder),
                    "{} is missing a field for {{{}}}",
                    def.id,
                    placeholder
                );
            }
        }
    }

    #[test]
    fn test_every_field_is_used() {
        for def in definitions() {
            let used = placeholders(&def.template);
            for field in &def.fields {
                assert!(
                    used.contains(&field.key),
                    "{} never uses field {}",
                    def.id,
                    field.key
                );
            }
        }
    }

    #[test]
    fn test_defaults_parse() {
        for def in definitions() {
            for field in &def.fields {
                assert!(field.default_value().is_ok(), "{}: {}", def.id, field.key);
            }
        }
    }
}
