use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::commands::form::{ask_field, select_contract_type};
use crate::core::{build_prompt, load_registry, ApiCredential, GeminiClient, GenerationClient};
use crate::error::DraftError;
use crate::models::{Config, ContractRequest, ContractTypeDefinition, FieldKind, FieldValue};

/// Draft options
#[derive(Debug, Default)]
pub struct DraftOptions {
    /// Contract type identifier or slug (asked interactively if None)
    pub contract_type: Option<String>,
    /// `KEY=VALUE` assignments from the command line
    pub assignments: Vec<String>,
    /// YAML file mapping field names to values
    pub values_file: Option<PathBuf>,
    /// Never prompt; unset fields take their defaults
    pub no_input: bool,
    /// Print the prompt instead of calling the API
    pub dry_run: bool,
    /// Write the generated contract to this file
    pub output: Option<PathBuf>,
}

/// Collect values, build the prompt and generate the contract
pub async fn draft_contract(
    project_root: &Path,
    config: &Config,
    credential: ApiCredential,
    options: DraftOptions,
) -> Result<(), DraftError> {
    let registry = load_registry(project_root, config)?;

    let definition = match options.contract_type.as_deref() {
        Some(name) => registry.get(name)?,
        None if options.no_input => {
            return Err(DraftError::Input(
                "no contract type given and --no-input is set".to_string(),
            ))
        }
        None => select_contract_type(&registry)?,
    };
    info!("Drafting '{}'", definition.id);

    let mut request = definition.request();
    if let Some(path) = &options.values_file {
        apply_values_file(definition, &mut request, path)?;
    }
    for assignment in &options.assignments {
        let (name, value) = parse_assignment(assignment)?;
        definition.set_value(&mut request, &name, &value)?;
    }

    let today = Local::now().date_naive();
    if options.no_input {
        fill_defaults(definition, &mut request, today)?;
    } else {
        for field in &definition.fields {
            if request.contains(&field.key) {
                continue;
            }
            if let Some(value) = ask_field(field, today)? {
                request.insert(&field.key, value);
            }
        }
    }
    debug!("Collected {} of {} fields", request.len(), definition.fields.len());

    let prompt = build_prompt(definition, &request)?;

    if options.dry_run {
        println!("=== Prompt ({}) ===\n", definition.id);
        println!("{}", prompt);
        println!("Run without --dry-run to generate the contract.");
        return Ok(());
    }

    let generator = GeminiClient::new(
        config.gemini.clone(),
        credential,
        config.behavior.stream_output,
    )?;
    let streamed = generator.streams_to_stdout();
    let client = GenerationClient::new(generator, config.generation.max_attempts);

    if streamed {
        println!("=== Generated Contract ===\n");
    }

    // Exhaustion is reported once, by the caller
    let text = client.generate(&prompt).await?;

    if !streamed {
        println!("=== Generated Contract ===\n");
        println!("{}", text);
    }

    if let Some(output) = &options.output {
        write_output(output, &text)?;
        println!("\nSaved to {}", output.display());
    }

    Ok(())
}

/// Split a `KEY=VALUE` argument
pub fn parse_assignment(arg: &str) -> Result<(String, String), DraftError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(DraftError::InvalidAssignment(arg.to_string())),
    }
}

/// Apply a YAML mapping of field name to scalar value
pub fn apply_values_file(
    definition: &ContractTypeDefinition,
    request: &mut ContractRequest,
    path: &Path,
) -> Result<(), DraftError> {
    let content = fs::read_to_string(path)?;
    apply_values_yaml(definition, request, path, &content)
}

fn apply_values_yaml(
    definition: &ContractTypeDefinition,
    request: &mut ContractRequest,
    path: &Path,
    content: &str,
) -> Result<(), DraftError> {
    let invalid = |reason: String| DraftError::ValuesFile(path.to_path_buf(), reason);

    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;

    for (key, value) in mapping {
        let name = scalar_to_string(&key)
            .ok_or_else(|| invalid(format!("field name {:?} is not a scalar", key)))?;
        let raw = scalar_to_string(&value)
            .ok_or_else(|| invalid(format!("value of '{}' is not a scalar", name)))?;
        definition.set_value(request, &name, &raw)?;
    }
    Ok(())
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Give every unset field its default; dates without one get `today`
pub fn fill_defaults(
    definition: &ContractTypeDefinition,
    request: &mut ContractRequest,
    today: NaiveDate,
) -> Result<(), DraftError> {
    for field in &definition.fields {
        if request.contains(&field.key) {
            continue;
        }
        if let Some(value) = field.default_value()? {
            request.insert(&field.key, value);
        } else if field.kind == FieldKind::Date {
            request.insert(&field.key, FieldValue::Date(today));
        }
    }
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<(), DraftError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    info!("Wrote {} characters to {}", text.len(), path.display());
    Ok(())
}
