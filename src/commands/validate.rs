use std::path::Path;

use crate::core::{discover_contract_files, parse_contract_file, IssueSeverity, TemplateRegistry};
use crate::error::DraftError;
use crate::models::{Config, CONFIG_FILE};
use crate::templates::builtin_definitions;

/// Validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn error(&mut self, message: String) {
        self.errors.push(message);
        self.valid = false;
    }
}

/// Check the configuration and every contract type, built-in and user-defined
pub fn validate_project(project_root: &Path) -> Result<ValidationResult, DraftError> {
    let mut result = ValidationResult {
        valid: true,
        ..ValidationResult::default()
    };

    let config_file = project_root.join(CONFIG_FILE);
    let config = if config_file.exists() {
        match Config::load_from_file(&config_file) {
            Ok(config) => {
                if let Err(e) = config.validate() {
                    result.error(e.to_string());
                }
                config
            }
            Err(e) => {
                result.error(e.to_string());
                Config::default()
            }
        }
    } else {
        result
            .warnings
            .push(format!("Missing {} (using defaults)", CONFIG_FILE));
        Config::default()
    };

    // Identifiers across all sources must be unique, so register as we go
    let mut registry = TemplateRegistry::new();
    let mut definitions: Vec<(String, _)> = builtin_definitions()
        .into_iter()
        .map(|d| ("built-in".to_string(), d))
        .collect();

    let contracts_dir = project_root.join(&config.behavior.contracts_dir);
    if !contracts_dir.is_dir() {
        result.warnings.push(format!(
            "Contracts folder not found: {} (only built-in types available)",
            config.behavior.contracts_dir.display()
        ));
    }
    match discover_contract_files(&contracts_dir) {
        Ok(files) => {
            for path in files {
                let source = path.display().to_string();
                match parse_contract_file(&path) {
                    Ok(def) => definitions.push((source, def)),
                    Err(e) => result.error(e.to_string()),
                }
            }
        }
        Err(e) => result.error(format!("Failed to discover contract types: {}", e)),
    }

    for (source, def) in definitions {
        let issues = TemplateRegistry::check(&def);
        let has_errors = issues.iter().any(|i| i.severity == IssueSeverity::Error);
        for issue in issues {
            let message = format!("'{}' ({}): {}", issue.contract, source, issue.message);
            match issue.severity {
                IssueSeverity::Error => result.error(message),
                IssueSeverity::Warning => result.warnings.push(message),
            }
        }

        // Only duplicates can still fail here
        if !has_errors {
            let id = def.id.clone();
            if let Err(e) = registry.register(def) {
                result.error(format!("'{}' ({}): {}", id, source, e));
            }
        }
    }

    Ok(result)
}

/// Print validation result
pub fn print_validation_result(result: &ValidationResult) {
    println!("=== Validation Result ===\n");

    if result.valid {
        println!("Status: VALID\n");
    } else {
        println!("Status: INVALID\n");
    }

    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
        println!();
    }

    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    if result.valid && result.errors.is_empty() && result.warnings.is_empty() {
        println!("All checks passed!");
    }
}
