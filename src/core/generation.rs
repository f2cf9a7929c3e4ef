//! Fixed-count retry around a single text generation call

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::{ExhaustedRetries, GenerationError};

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }
}

/// Sends a prompt to a [`TextGenerator`], retrying failed attempts.
///
/// Attempts run back to back: no delay between them and no distinction
/// between kinds of failure.
pub struct GenerationClient<G> {
    generator: G,
    max_attempts: u32,
}

impl<G: TextGenerator> GenerationClient<G> {
    /// `max_attempts` below 1 is treated as 1
    pub fn new(generator: G, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Return the first successful attempt's text, or [`ExhaustedRetries`]
    /// once `max_attempts` attempts in a row have failed
    pub async fn generate(&self, prompt: &str) -> Result<String, ExhaustedRetries> {
        debug!(
            "Generating from a {} character prompt (max {} attempts)",
            prompt.len(),
            self.max_attempts
        );

        let mut last_error = GenerationError::new("no attempt made");
        for attempt in 1..=self.max_attempts {
            match self.generator.generate(prompt).await {
                Ok(text) => {
                    info!("Generated {} characters on attempt {}", text.len(), attempt);
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed due to: {}. Retrying...",
                        attempt, self.max_attempts, e
                    );
                    last_error = e;
                }
            }
        }

        error!(
            "Failed to generate a response after {} attempts",
            self.max_attempts
        );
        Err(ExhaustedRetries {
            attempts: self.max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails until `succeed_on`, counting calls
    struct FlakyGenerator {
        succeed_on: Option<u32>,
        calls: AtomicU32,
    }

    impl FlakyGenerator {
        fn new(succeed_on: Option<u32>) -> Self {
            Self {
                succeed_on,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.succeed_on {
                Some(n) if call == n => Ok(format!("draft for: {}", prompt)),
                _ => Err(GenerationError::new(format!("call {} failed", call))),
            }
        }
    }

    #[test]
    fn test_all_attempts_fail() {
        for n in 1..=6 {
            let client = GenerationClient::new(FlakyGenerator::new(None), n);
            let err = tokio_test::block_on(client.generate("p")).unwrap_err();
            assert_eq!(err.attempts, n);
            assert_eq!(client.generator().calls(), n);
            assert_eq!(err.last_error, GenerationError::new(format!("call {} failed", n)));
        }
    }

    #[test]
    fn test_stops_at_first_success() {
        for n in 1..=5 {
            for k in 1..=n {
                let client = GenerationClient::new(FlakyGenerator::new(Some(k)), n);
                let text = tokio_test::block_on(client.generate("p")).unwrap();
                assert_eq!(text, "draft for: p");
                assert_eq!(client.generator().calls(), k);
            }
        }
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let client = GenerationClient::new(FlakyGenerator::new(None), 0);
        assert_eq!(client.max_attempts(), 1);
        assert!(tokio_test::block_on(client.generate("p")).is_err());
        assert_eq!(client.generator().calls(), 1);
    }

    #[tokio::test]
    async fn test_boxed_generator() {
        let boxed: Box<dyn TextGenerator> = Box::new(FlakyGenerator::new(Some(1)));
        let client = GenerationClient::new(boxed, 2);
        assert_eq!(client.generate("x").await.unwrap(), "draft for: x");
    }
}
