//! Packing tokenizer output for the classifier and decoding its raw
//! logits back into a probability distribution.

use crate::tokenizer::TokenizedInput;
use crate::{Result, SentimentError};

// Shifted logits are clamped to this range before exponentiation.
const CLAMP_BOUND: f64 = 50.0;

/// Pack tokenizer output into the two fixed-width int32 tensors the
/// classifier consumes.
pub fn encode(tokens: &TokenizedInput) -> Result<(Vec<i32>, Vec<i32>)> {
    if tokens.input_ids.len() != tokens.attention_mask.len() {
        return Err(SentimentError::Internal(format!(
            "input_ids and attention_mask length mismatch: {} vs {}",
            tokens.input_ids.len(),
            tokens.attention_mask.len()
        )));
    }

    let input_ids = tokens
        .input_ids
        .iter()
        .map(|&id| {
            i32::try_from(id).map_err(|_| {
                SentimentError::Internal(format!("Token ID {} exceeds int32 range", id))
            })
        })
        .collect::<Result<Vec<i32>>>()?;
    let attention_mask = tokens.attention_mask.iter().map(|&m| m as i32).collect();

    Ok((input_ids, attention_mask))
}

/// Numerically-stable softmax: subtract the maximum logit, clamp the
/// shifted values so exponentiation cannot overflow, then normalize.
pub fn softmax(logits: &[f32]) -> Result<Vec<f64>> {
    if logits.is_empty() {
        return Err(SentimentError::Internal(
            "Cannot normalize an empty logits vector".to_string(),
        ));
    }

    let max_logit = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b as f64));
    let exps: Vec<f64> = logits
        .iter()
        .map(|&x| ((x as f64 - max_logit).clamp(-CLAMP_BOUND, CLAMP_BOUND)).exp())
        .collect();
    let sum: f64 = exps.iter().sum();

    Ok(exps.iter().map(|&e| e / sum).collect())
}

/// First index attaining the maximum; ties resolve to the lowest index.
pub fn argmax(probabilities: &[f64]) -> Result<usize> {
    if probabilities.is_empty() {
        return Err(SentimentError::Internal(
            "Cannot take argmax of an empty distribution".to_string(),
        ));
    }

    let mut best = 0;
    for (idx, &p) in probabilities.iter().enumerate().skip(1) {
        if p > probabilities[best] {
            best = idx;
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_packs_ids_and_mask() {
        let tokens = TokenizedInput {
            input_ids: vec![2, 4, 5, 3, 0, 0],
            attention_mask: vec![1, 1, 1, 1, 0, 0],
        };

        let (ids, mask) = encode(&tokens).unwrap();
        assert_eq!(ids, vec![2, 4, 5, 3, 0, 0]);
        assert_eq!(mask, vec![1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_encode_rejects_length_mismatch() {
        let tokens = TokenizedInput {
            input_ids: vec![2, 4, 3],
            attention_mask: vec![1, 1],
        };

        assert!(matches!(encode(&tokens), Err(SentimentError::Internal(_))));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]).unwrap();

        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 0.01, "Probabilities should sum to 1.0");
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        // Relative ordering preserved
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_known_values() {
        // [2, 0, 1] should come out proportional to [e^2, e^0, e^1]
        let probs = softmax(&[2.0, 0.0, 1.0]).unwrap();

        let denom = 2.0_f64.exp() + 1.0 + 1.0_f64.exp();
        assert!((probs[0] - 2.0_f64.exp() / denom).abs() < 1e-6);
        assert!((probs[1] - 1.0 / denom).abs() < 1e-6);
        assert!((probs[2] - 1.0_f64.exp() / denom).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_extreme_logits() {
        let probs = softmax(&[1000.0, -1000.0, 0.0]).unwrap();

        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 0.01);
        assert!(probs[0] > 0.99);
    }

    #[test]
    fn test_softmax_rejects_empty() {
        assert!(matches!(softmax(&[]), Err(SentimentError::Internal(_))));
    }

    #[test]
    fn test_argmax_picks_maximum() {
        let probs = softmax(&[2.0, 0.0, 1.0]).unwrap();
        assert_eq!(argmax(&probs).unwrap(), 0);

        assert_eq!(argmax(&[0.1, 0.7, 0.2]).unwrap(), 1);
    }

    #[test]
    fn test_argmax_tie_breaks_to_lowest_index() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]).unwrap(), 0);
        assert_eq!(argmax(&[0.2, 0.4, 0.4]).unwrap(), 1);
    }

    #[test]
    fn test_argmax_rejects_empty() {
        assert!(matches!(argmax(&[]), Err(SentimentError::Internal(_))));
    }
}
