pub mod engine;
pub mod error;
pub mod model;
pub mod tensor;
pub mod tokenizer;
pub mod vocab;

pub use engine::{SentimentEngine, RECOMMENDED_MAX_CHARS};
pub use error::{Result, SentimentError};
pub use model::{Classifier, OnnxClassifier};
pub use tokenizer::{TokenizedInput, WordPieceTokenizer, MAX_SEQUENCE_LENGTH};
pub use vocab::{SpecialToken, Vocabulary};

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The outcome of one analyze call. Created once per call, immutable,
/// owned by the caller.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub label: String,                       // one of the configured label set
    pub confidence: f64,                     // probability of the predicted label, 0.0 to 1.0
    pub probabilities: HashMap<String, f64>, // full distribution over labels
    pub raw_logits: Vec<f32>,                // unnormalized classifier output
    pub score: f64,                          // signed sentiment, -1.0 to 1.0
    pub latency: Duration,                   // wall clock for the whole call
}

/// One model variant, matching the layout of its JSON config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    pub vocab_path: PathBuf,
    pub max_length: usize,
    pub labels: Vec<String>,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_intra_threads() -> usize {
    4
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(SentimentError::Config(
                "Model path cannot be empty".to_string(),
            ));
        }

        if self.vocab_path.as_os_str().is_empty() {
            return Err(SentimentError::Config(
                "Vocabulary path cannot be empty".to_string(),
            ));
        }

        if self.max_length < 2 {
            return Err(SentimentError::Config(
                "max_length must leave room for [CLS] and [SEP]".to_string(),
            ));
        }

        if self.labels.is_empty() {
            return Err(SentimentError::Config(
                "Label set cannot be empty".to_string(),
            ));
        }

        if self.intra_threads == 0 {
            return Err(SentimentError::Config(
                "intra_threads must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Interpret relative asset paths against the directory the config
    /// file was read from.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        self.model_path = base.join(&self.model_path);
        self.vocab_path = base.join(&self.vocab_path);
        self
    }
}
