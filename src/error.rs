use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for ContractDraft
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Exhausted(#[from] ExhaustedRetries),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid values file {0}: {1}")]
    ValuesFile(PathBuf, String),

    #[error("Invalid --set argument '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("Interactive input failed: {0}")]
    Input(String),
}

/// Errors related to contract types, their fields and templates
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown contract type: {0}")]
    UnknownContractType(String),

    #[error("Contract type already registered: {0}")]
    DuplicateContractType(String),

    #[error("Contract type '{contract}' has no field named '{field}'")]
    UnknownField { contract: String, field: String },

    #[error("Contract type '{contract}' defines field '{field}' more than once")]
    DuplicateField { contract: String, field: String },

    #[error("Template for '{contract}' references placeholder {{{placeholder}}} but no field defines it")]
    UndefinedPlaceholder { contract: String, placeholder: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Contract type '{contract}' field '{field}' is invalid: {reason}")]
    InvalidField {
        contract: String,
        field: String,
        reason: String,
    },

    #[error("Failed to read template file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),

    #[error("Failed to parse frontmatter in {0}: {1}")]
    FrontmatterError(PathBuf, String),

    #[error("Invalid YAML in {0}: {1}")]
    YamlError(PathBuf, String),
}

/// The single failure kind of an outbound generation call.
///
/// Connection problems, bad credentials, quota and malformed responses all
/// end up here; the retry loop does not look inside.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Generation failed: {0}")]
pub struct GenerationError(pub String);

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError(err.to_string())
    }
}

/// Every attempt of a generation request failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to generate a response after {attempts} attempts (last error: {last_error})")]
pub struct ExhaustedRetries {
    pub attempts: u32,
    pub last_error: GenerationError,
}

pub type Result<T> = std::result::Result<T, DraftError>;
