use std::path::Path;
use tracing::{debug, info};

use crate::core::gemini::ApiCredential;
use crate::core::registry::TemplateRegistry;
use crate::error::DraftError;
use crate::models::{Config, ConfigOverrides};

/// Load configuration from project directory with CLI overrides
pub fn load_config(project_root: &Path, overrides: ConfigOverrides) -> Result<Config, DraftError> {
    let config = Config::load_from_dir(project_root)?.with_overrides(overrides);
    config.validate()?;

    info!(
        "Configuration loaded: model={}, max_attempts={}, stream={}",
        config.gemini.model, config.generation.max_attempts, config.behavior.stream_output
    );

    Ok(config)
}

/// Built-in contract types plus those in the configured contracts folder
pub fn load_registry(project_root: &Path, config: &Config) -> Result<TemplateRegistry, DraftError> {
    let mut registry = TemplateRegistry::builtin()?;
    registry.load_dir(&project_root.join(&config.behavior.contracts_dir))?;
    Ok(registry)
}

/// Read the API key named by the config, after loading `.env` if present.
///
/// Called once at start-up; a missing key only surfaces when a request is made.
pub fn load_credential(project_root: &Path, config: &Config) -> ApiCredential {
    match dotenvy::from_path(project_root.join(".env")) {
        Ok(()) => debug!("Loaded environment from .env"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!("Ignoring unreadable .env: {}", e),
    }
    ApiCredential::from_env(&config.gemini.api_key_env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path(), ConfigOverrides::default()).unwrap();

        assert_eq!(config.gemini.model, "gemini-1.5-flash-latest");
        assert_eq!(config.generation.max_attempts, 5);
    }

    #[test]
    fn test_load_config_with_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("contractdraft.toml"),
            r#"
[gemini]
model = "gemini-1.5-pro"

[generation]
max_attempts = 2
"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path(), ConfigOverrides::default()).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.generation.max_attempts, 2);
    }

    #[test]
    fn test_load_config_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("contractdraft.toml"),
            "[generation]\nmax_attempts = 2\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            max_attempts: Some(7),
            stream: true,
            ..ConfigOverrides::default()
        };
        let config = load_config(temp_dir.path(), overrides).unwrap();
        assert_eq!(config.generation.max_attempts, 7);
        assert!(config.behavior.stream_output);
    }

    #[test]
    fn test_load_config_rejects_zero_attempts() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            max_attempts: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            load_config(temp_dir.path(), overrides),
            Err(DraftError::Config(_))
        ));
    }

    #[test]
    fn test_load_config_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("contractdraft.toml"), "[gemini\n").unwrap();
        assert!(load_config(temp_dir.path(), ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_load_registry_includes_project_contracts() {
        let temp_dir = TempDir::new().unwrap();
        let contracts = temp_dir.path().join("contracts");
        fs::create_dir_all(&contracts).unwrap();
        fs::write(
            contracts.join("loan.md"),
            "---\nname: Loan Agreement\nfields:\n  - label: Lender\n---\n",
        )
        .unwrap();

        let registry = load_registry(temp_dir.path(), &Config::default()).unwrap();
        assert_eq!(registry.len(), 7);
        assert!(registry.get("loan-agreement").is_ok());
    }

    #[test]
    fn test_load_credential_from_named_variable() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.gemini.api_key_env = "CONTRACTDRAFT_TEST_UNSET_KEY".to_string();
        assert!(!load_credential(temp_dir.path(), &config).is_present());
    }
}
