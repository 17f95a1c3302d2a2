use crate::{Result, SentimentError};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;

/// The classifier contract the pipeline drives: two equal-length int32
/// vectors in, one float32 logits vector out. What happens inside is the
/// backend's business.
pub trait Classifier: Send {
    fn infer(&mut self, input_ids: &[i32], attention_mask: &[i32]) -> Result<Vec<f32>>;
}

/// ONNX Runtime classifier.
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Builds the session once. The intra-op thread-pool degree is fixed
    /// here and never changes for the lifetime of the session.
    pub fn load(model_path: &Path, intra_threads: usize) -> Result<Self> {
        tracing::info!("Loading classifier model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(SentimentError::Load(format!(
                "Model file not found: {:?}",
                model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e| SentimentError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| SentimentError::Load(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| SentimentError::Load(format!("Failed to set thread count: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| SentimentError::Load(format!("Failed to load model: {}", e)))?;

        tracing::info!("Classifier model loaded");
        Ok(Self { session })
    }
}

impl Classifier for OnnxClassifier {
    fn infer(&mut self, input_ids: &[i32], attention_mask: &[i32]) -> Result<Vec<f32>> {
        use ort::value::TensorRef;

        let shape = [1_usize, input_ids.len()];
        let input_ids_tensor = TensorRef::from_array_view((shape, input_ids)).map_err(|e| {
            SentimentError::Inference(format!("Failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask_tensor =
            TensorRef::from_array_view((shape, attention_mask)).map_err(|e| {
                SentimentError::Inference(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let outputs = self
            .session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| SentimentError::Inference(format!("Inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| SentimentError::Inference("Model produced no logits output".to_string()))?;

        // try_extract_tensor returns (&Shape, &[T])
        let (_shape, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| SentimentError::Inference(format!("Failed to extract logits: {}", e)))?;

        Ok(data.to_vec())
    }
}
