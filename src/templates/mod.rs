//! Bundled contract types and the files written by `contractdraft init`

pub mod agreement;
pub mod brief;

use crate::models::ContractTypeDefinition;

/// All built-in contract types, in the order they are offered
pub fn builtin_definitions() -> Vec<ContractTypeDefinition> {
    let mut defs = brief::definitions();
    defs.extend(agreement::definitions());
    defs
}

/// Default contractdraft.toml written by `init`
pub const CONFIG: &str = r#"# ContractDraft configuration

[gemini]
url = "https://generativelanguage.googleapis.com/v1beta"
model = "gemini-1.5-flash-latest"
timeout_seconds = 120
# Environment variable holding the API key (a .env file is read too)
api_key_env = "GOOGLE_API_KEY"

[generation]
# Attempts before giving up on a draft
max_attempts = 5

[behavior]
# Print the contract as it streams in
stream_output = false
# Folder with user-defined contract types (*.md)
contracts_dir = "contracts"
"#;

/// Example user-defined contract type written by `init`
pub const EXAMPLE_CONTRACT: &str = r#"---
name: Consulting Agreement
description: Independent consultant engagement
style: template
fields:
  - label: Client
  - label: Consultant
  - label: Services
    kind: long_text
  - label: Hourly Rate
  - label: Start Date
    kind: date
  - label: Notice Period in days
    key: notice_days
    kind: number
    min: 1
    max: 180
    default: "14"
---
generate the professional contract based on the template below
This Consulting Agreement is made between {client} ("Client") and {consultant} ("Consultant").
1. **Services**: The Consultant will provide the following services: {services}.
2. **Fees**: The Client will pay the Consultant {hourly_rate} per hour, invoiced monthly.
3. **Commencement**: The engagement starts on {start_date}.
4. **Termination**: Either party may terminate this Agreement with {notice_days} days' written notice.
IN WITNESS WHEREOF, the parties have executed this Agreement on the date first written above.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let defs = builtin_definitions();
        let ids: HashSet<String> = defs.iter().map(|d| d.slug()).collect();
        assert_eq!(ids.len(), defs.len());
        assert_eq!(defs.len(), 6);
    }

    #[test]
    fn test_default_config_parses() {
        let config: crate::models::Config = toml::from_str(CONFIG).unwrap();
        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.gemini.api_key_env, "GOOGLE_API_KEY");
    }
}
