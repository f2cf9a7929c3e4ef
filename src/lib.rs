//! ContractDraft - contract drafting from typed templates via the Gemini API
//!
//! A contract type is a named list of fields plus a prompt template. The user
//! fills in the fields, the prompt is built from them and sent to the
//! generative-text service, retrying a fixed number of times on failure.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (init, list, validate, draft)
//! - **core**: Template registry, prompt builder, generation client, Gemini backend
//! - **models**: Data structures (config, contract types, requests)
//! - **templates**: Bundled contract types
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;
pub mod templates;

pub use error::{DraftError, ExhaustedRetries, GenerationError, Result, TemplateError};
