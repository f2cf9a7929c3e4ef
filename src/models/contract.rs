//! Contract type definitions and the values a user fills in for them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::TemplateError;

/// Date format accepted for date fields and used when rendering them
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of input a field collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single line of text
    #[default]
    Text,
    /// Free-form paragraph such as a clause
    LongText,
    /// Calendar date (YYYY-MM-DD)
    Date,
    /// Whole number, optionally bounded by `min`/`max`
    Number,
    /// One of a fixed list of `options`
    Choice,
}

impl FieldKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::LongText => "long text",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
            FieldKind::Choice => "choice",
        }
    }
}

/// How the prompt for a contract type is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Header line followed by one `label: value` line per field
    #[default]
    FieldList,
    /// `{key}` placeholders substituted into the template body
    Template,
}

/// A single field of a contract type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Placeholder key used in templates (snake_case); derived from the
    /// label when left empty
    #[serde(default)]
    pub key: String,
    /// Human-readable field name
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Pre-filled value; dates use YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values for choice fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl FieldDefinition {
    /// Text field whose key is derived from its label
    pub fn text(label: &str) -> Self {
        Self {
            key: field_key(label),
            label: label.to_string(),
            kind: FieldKind::Text,
            default: None,
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn long_text(label: &str) -> Self {
        Self {
            kind: FieldKind::LongText,
            ..Self::text(label)
        }
    }

    pub fn date(label: &str) -> Self {
        Self {
            kind: FieldKind::Date,
            ..Self::text(label)
        }
    }

    pub fn number(label: &str, min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            kind: FieldKind::Number,
            min,
            max,
            ..Self::text(label)
        }
    }

    pub fn choice(label: &str, options: &[&str]) -> Self {
        Self {
            kind: FieldKind::Choice,
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::text(label)
        }
    }

    /// Override the derived placeholder key
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Whether `name` refers to this field, by key or by label
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.key.eq_ignore_ascii_case(name) || self.label.eq_ignore_ascii_case(name)
    }

    /// Parse raw user input into a typed value for this field
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, TemplateError> {
        let invalid = |reason: String| TemplateError::InvalidValue {
            field: self.label.clone(),
            reason,
        };

        match self.kind {
            FieldKind::Text | FieldKind::LongText => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|e| invalid(format!("'{}' is not a YYYY-MM-DD date ({})", raw, e))),
            FieldKind::Number => {
                let n: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("'{}' is not a whole number", raw)))?;
                if let Some(min) = self.min {
                    if n < min {
                        return Err(invalid(format!("{} is below the minimum of {}", n, min)));
                    }
                }
                if let Some(max) = self.max {
                    if n > max {
                        return Err(invalid(format!("{} is above the maximum of {}", n, max)));
                    }
                }
                Ok(FieldValue::Number(n))
            }
            FieldKind::Choice => self
                .options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(raw.trim()))
                .map(|o| FieldValue::Text(o.clone()))
                .ok_or_else(|| {
                    invalid(format!(
                        "'{}' is not one of: {}",
                        raw,
                        self.options.join(", ")
                    ))
                }),
        }
    }

    /// The default parsed into a typed value, if there is one
    pub fn default_value(&self) -> Result<Option<FieldValue>, TemplateError> {
        self.default
            .as_deref()
            .map(|d| self.parse_value(d))
            .transpose()
    }
}

/// Derive a snake_case placeholder key from a field label
pub fn field_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_sep = false;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            pending_sep = true;
        }
    }
    key
}

/// Derive a URL/CLI friendly slug from a contract type identifier
pub fn slugify(name: &str) -> String {
    field_key(name).replace('_', "-")
}

/// A registered contract type: its field schema and prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTypeDefinition {
    /// Display name, e.g. "Employment Contract"
    pub id: String,
    pub style: PromptStyle,
    /// Fields in the order they are asked for and listed
    pub fields: Vec<FieldDefinition>,
    /// Template body (only used by [`PromptStyle::Template`])
    pub template: String,
    /// Short description shown by `list`
    pub description: Option<String>,
}

impl ContractTypeDefinition {
    pub fn field_list(id: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.to_string(),
            style: PromptStyle::FieldList,
            fields,
            template: String::new(),
            description: None,
        }
    }

    pub fn template(id: &str, fields: Vec<FieldDefinition>, template: &str) -> Self {
        Self {
            id: id.to_string(),
            style: PromptStyle::Template,
            fields,
            template: template.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn slug(&self) -> String {
        slugify(&self.id)
    }

    /// Whether `name` refers to this contract type, by identifier or slug
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.id.eq_ignore_ascii_case(name) || self.slug() == slugify(name)
    }

    /// Find a field by key or label
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.matches(name))
    }

    /// Start an empty request for this contract type
    pub fn request(&self) -> ContractRequest {
        ContractRequest::new(&self.id)
    }

    /// Parse and store `raw` for the field named `name` in `request`
    pub fn set_value(
        &self,
        request: &mut ContractRequest,
        name: &str,
        raw: &str,
    ) -> Result<(), TemplateError> {
        let field = self.field(name).ok_or_else(|| TemplateError::UnknownField {
            contract: self.id.clone(),
            field: name.to_string(),
        })?;
        let value = field.parse_value(raw)?;
        request.insert(&field.key, value);
        Ok(())
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Number(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Values entered for one draft, keyed by field key. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRequest {
    pub contract_type: String,
    values: HashMap<String, FieldValue>,
}

impl ContractRequest {
    pub fn new(contract_type: &str) -> Self {
        Self {
            contract_type: contract_type.to_string(),
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
