use crate::model::{Classifier, OnnxClassifier};
use crate::tokenizer::WordPieceTokenizer;
use crate::vocab::Vocabulary;
use crate::{tensor, ClassificationResult, ModelConfig, Result, SentimentError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Inputs longer than this are accepted but flagged; truncation will
/// discard most of the text anyway.
pub const RECOMMENDED_MAX_CHARS: usize = 1000;

/// The vocabulary/classifier pairing for one loaded model variant.
struct EngineAssets {
    tokenizer: WordPieceTokenizer,
    classifier: Box<dyn Classifier>,
    labels: Vec<String>,
}

enum EngineState {
    Unloaded,
    Loading,
    Ready(EngineAssets),
}

/// Sentiment analysis pipeline for one model variant.
///
/// The engine is a small state machine: Unloaded until `load` or `install`
/// succeeds, Loading while assets are being (re)built, Ready otherwise.
/// `analyze` against anything but Ready fails with `NotInitialized`.
pub struct SentimentEngine {
    config: ModelConfig,
    state: EngineState,
}

impl SentimentEngine {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            state: EngineState::Unloaded,
        }
    }

    /// Reads a model-variant config file, validates it, and loads the
    /// referenced assets. Relative asset paths are interpreted against the
    /// config file's directory.
    pub fn from_config_file(config_path: &Path) -> Result<Self> {
        tracing::info!("Initializing sentiment engine from: {:?}", config_path);

        let content = std::fs::read_to_string(config_path)?;
        let config: ModelConfig = serde_json::from_str(&content)?;
        config.validate()?;

        let base_dir = config_path.parent().ok_or_else(|| {
            SentimentError::Config("Config path has no parent directory".to_string())
        })?;

        let mut engine = Self::new(config.resolved_against(base_dir));
        engine.load()?;
        Ok(engine)
    }

    /// Load (or reload) assets for the configured variant. An engine that
    /// was Ready drops its previous assets before the new ones are built;
    /// a failed load leaves the engine Unloaded.
    pub fn load(&mut self) -> Result<()> {
        self.state = EngineState::Loading;
        match self.build_assets() {
            Ok(assets) => {
                self.state = EngineState::Ready(assets);
                tracing::info!("Sentiment engine ready");
                Ok(())
            }
            Err(e) => {
                self.state = EngineState::Unloaded;
                Err(e)
            }
        }
    }

    fn build_assets(&self) -> Result<EngineAssets> {
        let vocab = Arc::new(Vocabulary::load(&self.config.vocab_path)?);
        let tokenizer = WordPieceTokenizer::new(vocab, self.config.max_length)?;
        let classifier = OnnxClassifier::load(&self.config.model_path, self.config.intra_threads)?;

        Ok(EngineAssets {
            tokenizer,
            classifier: Box::new(classifier),
            labels: self.config.labels.clone(),
        })
    }

    /// Install caller-supplied assets instead of loading them from disk.
    /// State transitions match `load`; tests use this to run the pipeline
    /// against fake vocabularies and classifiers.
    pub fn install(&mut self, vocab: Arc<Vocabulary>, classifier: Box<dyn Classifier>) -> Result<()> {
        self.state = EngineState::Loading;
        match WordPieceTokenizer::new(vocab, self.config.max_length) {
            Ok(tokenizer) => {
                self.state = EngineState::Ready(EngineAssets {
                    tokenizer,
                    classifier,
                    labels: self.config.labels.clone(),
                });
                Ok(())
            }
            Err(e) => {
                self.state = EngineState::Unloaded;
                Err(e)
            }
        }
    }

    /// Drop the loaded classifier and vocabulary and return to Unloaded.
    pub fn unload(&mut self) {
        self.state = EngineState::Unloaded;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run the full pipeline on one text: validate, tokenize, encode,
    /// infer, decode. The returned latency spans this entire call. Every
    /// failure surfaces to the caller; nothing is retried.
    pub fn analyze(&mut self, text: &str) -> Result<ClassificationResult> {
        let started = Instant::now();
        let max_length = self.config.max_length;

        let assets = match &mut self.state {
            EngineState::Ready(assets) => assets,
            _ => return Err(SentimentError::NotInitialized),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SentimentError::InvalidInput(
                "Text is empty or whitespace-only".to_string(),
            ));
        }
        if trimmed.chars().count() > RECOMMENDED_MAX_CHARS {
            tracing::warn!(
                "Input exceeds {} characters; the tail will be truncated",
                RECOMMENDED_MAX_CHARS
            );
        }

        let tokens = assets.tokenizer.tokenize(trimmed);
        if tokens.input_ids.len() != max_length || tokens.attention_mask.len() != max_length {
            return Err(SentimentError::Internal(format!(
                "Tokenizer produced {}/{} values, expected {}",
                tokens.input_ids.len(),
                tokens.attention_mask.len(),
                max_length
            )));
        }

        let (input_ids, attention_mask) = tensor::encode(&tokens)?;
        let logits = assets.classifier.infer(&input_ids, &attention_mask)?;

        if logits.len() != assets.labels.len() {
            return Err(SentimentError::Internal(format!(
                "Expected {} logits, got {}",
                assets.labels.len(),
                logits.len()
            )));
        }

        let probabilities = tensor::softmax(&logits)?;
        let best = tensor::argmax(&probabilities)?;
        let label = assets.labels.get(best).cloned().ok_or_else(|| {
            SentimentError::Internal(format!(
                "Predicted index {} out of range for {} labels",
                best,
                assets.labels.len()
            ))
        })?;

        let distribution: HashMap<String, f64> = assets
            .labels
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect();
        let score = weighted_score(&assets.labels, &probabilities);

        tracing::debug!(
            "Sentiment for '{}': {} (score: {:.3}, confidence: {:.3})",
            trimmed.chars().take(50).collect::<String>(),
            label,
            score,
            probabilities[best]
        );

        Ok(ClassificationResult {
            label,
            confidence: probabilities[best],
            probabilities: distribution,
            raw_logits: logits,
            score,
            latency: started.elapsed(),
        })
    }

    /// Analyze several texts one after another; the first failure aborts.
    pub fn analyze_batch(&mut self, texts: &[&str]) -> Result<Vec<ClassificationResult>> {
        texts.iter().map(|text| self.analyze(text)).collect()
    }
}

/// P(positive) - P(negative); labels that are neither contribute nothing.
fn weighted_score(labels: &[String], probabilities: &[f64]) -> f64 {
    labels
        .iter()
        .zip(probabilities)
        .map(|(label, p)| match label.as_str() {
            "positive" => *p,
            "negative" => -*p,
            _ => 0.0,
        })
        .sum()
}
