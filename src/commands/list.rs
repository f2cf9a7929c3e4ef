use std::path::Path;

use crate::core::load_registry;
use crate::error::DraftError;
use crate::models::{Config, ContractTypeDefinition, FieldKind, PromptStyle};

const FIELDS_HINT: &str = "Use 'contractdraft list --fields' to show fields";

/// Show registered contract types
pub fn list_contract_types(project_root: &Path, config: &Config, verbose: bool) -> Result<(), DraftError> {
    let registry = load_registry(project_root, config)?;

    println!("=== Contract Types ===\n");

    if registry.is_empty() {
        println!("No contract types registered.");
        return Ok(());
    }

    for def in registry.definitions() {
        print!("  {} ({})", def.id, def.slug());
        if let Some(ref description) = def.description {
            print!(" - {}", description);
        }
        println!();

        if verbose {
            print_fields(def);
        }
    }

    if !verbose {
        println!("\n{}", FIELDS_HINT);
    }

    Ok(())
}

fn print_fields(def: &ContractTypeDefinition) {
    let style = match def.style {
        PromptStyle::FieldList => "field list",
        PromptStyle::Template => "template",
    };
    println!("    Style: {}", style);

    for field in &def.fields {
        let mut line = format!("    - {} [{}, {}]", field.label, field.key, field.kind.display_name());
        match field.kind {
            FieldKind::Choice => line.push_str(&format!(" options: {}", field.options.join(" | "))),
            FieldKind::Number => {
                let bound = |b: Option<i64>| b.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
                line.push_str(&format!(" range: {}..{}", bound(field.min), bound(field.max)));
            }
            _ => {}
        }
        if let Some(ref default) = field.default {
            let shown: String = default.chars().take(40).collect();
            let ellipsis = if default.chars().count() > 40 { "..." } else { "" };
            line.push_str(&format!(" default: \"{}{}\"", shown, ellipsis));
        }
        println!("{}", line);
    }
    println!();
}
