//! Common test utilities

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use contractdraft::core::TextGenerator;
use contractdraft::GenerationError;

/// Create a test project with a config file and an empty contracts folder
pub fn create_test_project() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project_root = temp_dir.path().to_path_buf();

    fs::create_dir_all(project_root.join("contracts")).expect("Failed to create contracts dir");
    fs::write(
        project_root.join("contractdraft.toml"),
        "[generation]\nmax_attempts = 3\n",
    )
    .expect("Failed to write config");

    (temp_dir, project_root)
}

/// Write a user-defined contract type file
pub fn create_contract_file(project_root: &PathBuf, file: &str, frontmatter: &str, body: &str) {
    let content = format!("---\n{}\n---\n{}\n", frontmatter.trim(), body);
    fs::write(project_root.join("contracts").join(file), content)
        .expect("Failed to write contract file");
}

/// Generator that replays scripted results and records every prompt it sees
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `failures` failing calls followed by one returning `text`
    pub fn failing_then(failures: usize, text: &str) -> Self {
        let mut responses: Vec<_> = (1..=failures)
            .map(|i| Err(GenerationError::new(format!("transient failure {}", i))))
            .collect();
        responses.push(Ok(text.to_string()));
        Self::new(responses)
    }

    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::new("service unavailable")))
    }
}
