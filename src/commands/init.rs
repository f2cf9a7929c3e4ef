use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::DraftError;
use crate::models::{Config, CONFIG_FILE};
use crate::templates::{CONFIG, EXAMPLE_CONTRACT};

/// Initialize a ContractDraft project: config file and contracts folder
pub fn init_project(project_root: &Path) -> Result<(), DraftError> {
    println!("Initializing ContractDraft project...");

    if !project_root.exists() {
        fs::create_dir_all(project_root)?;
    }

    create_file_if_not_exists(&project_root.join(CONFIG_FILE), CONFIG)?;

    // The folder name comes from the config actually in place
    let config = Config::load_from_dir(project_root)?;
    let contracts_dir = project_root.join(&config.behavior.contracts_dir);
    if !contracts_dir.exists() {
        fs::create_dir_all(&contracts_dir)?;
        info!("Created contracts directory: {}", contracts_dir.display());
    } else {
        info!("Contracts directory already exists: {}", contracts_dir.display());
    }

    create_file_if_not_exists(
        &contracts_dir.join("consulting_agreement.md"),
        EXAMPLE_CONTRACT,
    )?;

    info!("ContractDraft project initialized successfully!");
    print_next_steps(project_root, &config);

    Ok(())
}

fn create_file_if_not_exists(path: &Path, content: &str) -> Result<(), DraftError> {
    if !path.exists() {
        fs::write(path, content)?;
        info!("Created file: {}", path.display());
    } else {
        info!("File already exists: {}", path.display());
    }
    Ok(())
}

fn print_next_steps(project_root: &Path, config: &Config) {
    println!("ContractDraft project initialized at {}", project_root.display());
    println!("\nNext steps:");
    println!(
        "1. Put your API key in {} (environment or .env file)",
        config.gemini.api_key_env
    );
    println!(
        "2. Add contract types to {}/ (see consulting_agreement.md)",
        config.behavior.contracts_dir.display()
    );
    println!("3. Run 'contractdraft validate' to check them");
    println!("4. Run 'contractdraft draft' to draft a contract");
}
