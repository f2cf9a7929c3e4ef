use gray_matter::engine::YAML;
use gray_matter::Matter;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::prompt::placeholders;
use crate::error::TemplateError;
use crate::models::{field_key, ContractTypeDefinition, FieldDefinition, FieldKind, PromptStyle};
use crate::templates::builtin_definitions;

/// Severity of a problem found in a contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A problem found while checking a contract type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
    pub contract: String,
    pub severity: IssueSeverity,
    pub message: String,
}

impl TemplateIssue {
    fn error(contract: &str, message: String) -> Self {
        Self {
            contract: contract.to_string(),
            severity: IssueSeverity::Error,
            message,
        }
    }

    fn warning(contract: &str, message: String) -> Self {
        Self {
            contract: contract.to_string(),
            severity: IssueSeverity::Warning,
            message,
        }
    }
}

/// Frontmatter of a user-defined contract type file
#[derive(Debug, Deserialize)]
struct ContractFileMetadata {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    style: PromptStyle,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

/// Registry of contract types keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    definitions: Vec<ContractTypeDefinition>,
}

impl TemplateRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the bundled contract types
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self::new();
        for def in builtin_definitions() {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Check and add a contract type.
    ///
    /// Fails on the first error-level issue; warnings are logged.
    pub fn register(&mut self, definition: ContractTypeDefinition) -> Result<(), TemplateError> {
        if self.definitions.iter().any(|d| d.slug() == definition.slug()) {
            return Err(TemplateError::DuplicateContractType(definition.id));
        }

        Self::check_strict(&definition)?;
        for issue in Self::check(&definition) {
            if issue.severity == IssueSeverity::Warning {
                warn!("{}: {}", issue.contract, issue.message);
            }
        }

        debug!(
            "Registered contract type '{}' with {} fields",
            definition.id,
            definition.fields.len()
        );
        self.definitions.push(definition);
        Ok(())
    }

    /// Look up a contract type by identifier or slug
    pub fn get(&self, name: &str) -> Result<&ContractTypeDefinition, TemplateError> {
        self.definitions
            .iter()
            .find(|d| d.matches(name))
            .ok_or_else(|| TemplateError::UnknownContractType(name.to_string()))
    }

    /// Identifiers in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn definitions(&self) -> &[ContractTypeDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Register every `*.md` contract type file in `dir`.
    ///
    /// Files starting with `_` are skipped. Returns the number registered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, TemplateError> {
        let mut loaded = 0;
        for path in discover_contract_files(dir)? {
            let definition = parse_contract_file(&path)?;
            self.register(definition)?;
            loaded += 1;
        }
        if loaded > 0 {
            info!("Loaded {} contract types from {}", loaded, dir.display());
        }
        Ok(loaded)
    }

    /// All problems with a contract type, errors and warnings alike
    pub fn check(definition: &ContractTypeDefinition) -> Vec<TemplateIssue> {
        let id = definition.id.as_str();
        let mut issues = Vec::new();

        if definition.fields.is_empty() {
            issues.push(TemplateIssue::warning(id, "defines no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &definition.fields {
            if field.key.is_empty() {
                issues.push(TemplateIssue::error(
                    id,
                    format!("field '{}' has an empty key", field.label),
                ));
            }
            if !seen.insert(field.key.as_str()) {
                issues.push(TemplateIssue::error(
                    id,
                    format!("field key '{}' is defined more than once", field.key),
                ));
            }
            if field.kind == FieldKind::Choice && field.options.is_empty() {
                issues.push(TemplateIssue::error(
                    id,
                    format!("choice field '{}' has no options", field.key),
                ));
            }
            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    issues.push(TemplateIssue::error(
                        id,
                        format!("field '{}' has min {} above max {}", field.key, min, max),
                    ));
                }
            }
            if let Err(e) = field.default_value() {
                issues.push(TemplateIssue::error(
                    id,
                    format!("field '{}' has an invalid default: {}", field.key, e),
                ));
            }
        }

        match definition.style {
            PromptStyle::Template => {
                let used = placeholders(&definition.template);
                if used.is_empty() {
                    issues.push(TemplateIssue::warning(
                        id,
                        "template contains no placeholders".to_string(),
                    ));
                }
                for key in &used {
                    if !definition.fields.iter().any(|f| &f.key == key) {
                        issues.push(TemplateIssue::error(
                            id,
                            format!("template references {{{}}} but no field defines it", key),
                        ));
                    }
                }
                for field in &definition.fields {
                    if !used.contains(&field.key) {
                        issues.push(TemplateIssue::warning(
                            id,
                            format!("field '{}' is collected but never used by the template", field.key),
                        ));
                    }
                }
            }
            PromptStyle::FieldList => {
                if !definition.template.trim().is_empty() {
                    issues.push(TemplateIssue::warning(
                        id,
                        "template body is ignored for field_list contract types".to_string(),
                    ));
                }
            }
        }

        issues
    }

    /// Turn the first error-level issue into a typed error
    fn check_strict(definition: &ContractTypeDefinition) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for field in &definition.fields {
            if !seen.insert(field.key.as_str()) {
                return Err(TemplateError::DuplicateField {
                    contract: definition.id.clone(),
                    field: field.key.clone(),
                });
            }
            if field.key.is_empty() {
                return Err(TemplateError::InvalidField {
                    contract: definition.id.clone(),
                    field: field.label.clone(),
                    reason: "empty key".to_string(),
                });
            }
            if field.kind == FieldKind::Choice && field.options.is_empty() {
                return Err(TemplateError::InvalidField {
                    contract: definition.id.clone(),
                    field: field.key.clone(),
                    reason: "choice field without options".to_string(),
                });
            }
            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(TemplateError::InvalidField {
                        contract: definition.id.clone(),
                        field: field.key.clone(),
                        reason: format!("min {} above max {}", min, max),
                    });
                }
            }
            field.default_value()?;
        }

        if definition.style == PromptStyle::Template {
            for key in placeholders(&definition.template) {
                if !definition.fields.iter().any(|f| f.key == key) {
                    return Err(TemplateError::UndefinedPlaceholder {
                        contract: definition.id.clone(),
                        placeholder: key,
                    });
                }
            }
        }
        Ok(())
    }
}

/// List `*.md` files in `dir`, sorted, skipping `_`-prefixed files.
/// A missing directory yields no files.
pub fn discover_contract_files(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    if !dir.is_dir() {
        debug!("No contract types folder at {}", dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| TemplateError::ReadError(dir.to_path_buf(), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| TemplateError::ReadError(dir.to_path_buf(), e))?
            .path();
        if !path.is_file() {
            continue;
        }
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            if filename.starts_with('_') || !filename.ends_with(".md") {
                continue;
            }
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse a contract type file: YAML frontmatter plus template body
pub fn parse_contract_file(path: &Path) -> Result<ContractTypeDefinition, TemplateError> {
    let content =
        fs::read_to_string(path).map_err(|e| TemplateError::ReadError(path.to_path_buf(), e))?;
    parse_contract_source(path, &content)
}

fn parse_contract_source(path: &Path, content: &str) -> Result<ContractTypeDefinition, TemplateError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(content);

    if parsed.matter.trim().is_empty() {
        return Err(TemplateError::FrontmatterError(
            path.to_path_buf(),
            "No frontmatter found".to_string(),
        ));
    }

    let metadata: ContractFileMetadata = serde_yaml::from_str(&parsed.matter)
        .map_err(|e| TemplateError::YamlError(path.to_path_buf(), e.to_string()))?;

    let fields = metadata
        .fields
        .into_iter()
        .map(|mut field| {
            if field.key.trim().is_empty() {
                field.key = field_key(&field.label);
            }
            field
        })
        .collect();

    let template = match metadata.style {
        PromptStyle::Template => parsed.content.trim().to_string(),
        PromptStyle::FieldList => String::new(),
    };

    debug!("Parsed contract file {}", path.display());

    Ok(ContractTypeDefinition {
        id: metadata.name,
        style: metadata.style,
        fields,
        template,
        description: metadata.description,
    })
}
