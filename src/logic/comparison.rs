//! Model Comparison Aggregation
//!
//! Combines the two per-model results of a comparison call into a single
//! consensus/divergence verdict with per-probability deltas and a
//! higher-confidence winner.

use serde::Serialize;

use crate::api::types::{ClassificationResult, ComparisonResponse, ModelId};

/// Derived verdict over two per-model results; never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    /// Both models produced the same predicted label
    pub consensus: bool,

    /// Model whose result carries the larger confidence
    pub winning_model: ModelId,

    /// Absolute difference of the AI probabilities
    pub ai_probability_delta: f64,

    /// Absolute difference of the human probabilities
    pub human_probability_delta: f64,
}

impl ComparisonOutcome {
    /// AI delta rounded to two decimals for display; the raw float is retained
    pub fn ai_probability_delta_display(&self) -> f64 {
        round2(self.ai_probability_delta)
    }

    /// Human delta rounded to two decimals for display
    pub fn human_probability_delta_display(&self) -> f64 {
        round2(self.human_probability_delta)
    }
}

/// Aggregate the results of model B and model N
///
/// The winner is the result with strictly greater confidence
/// (`max(ai, human)` over clamped probabilities); ties resolve to model B,
/// the first argument.
pub fn compare(
    result_b: &ClassificationResult,
    result_n: &ClassificationResult,
) -> ComparisonOutcome {
    let confidence_b = result_b.confidence();
    let confidence_n = result_n.confidence();

    ComparisonOutcome {
        consensus: result_b.prediction == result_n.prediction,
        winning_model: if confidence_b >= confidence_n {
            ModelId::B
        } else {
            ModelId::N
        },
        ai_probability_delta: (result_b.ai_probability - result_n.ai_probability).abs(),
        human_probability_delta: (result_b.human_probability - result_n.human_probability).abs(),
    }
}

/// Aggregate a comparison endpoint body
pub fn compare_response(response: &ComparisonResponse) -> ComparisonOutcome {
    compare(&response.model_b, &response.model_n)
}

/// Round to two decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Prediction;

    fn result(prediction: Prediction, ai: f64, human: f64) -> ClassificationResult {
        ClassificationResult {
            prediction,
            ai_probability: ai,
            human_probability: human,
            model: None,
        }
    }

    #[test]
    fn test_consensus_when_predictions_agree() {
        let b = result(Prediction::Ai, 80.0, 20.0);
        let n = result(Prediction::Ai, 60.0, 40.0);
        assert!(compare(&b, &n).consensus);
    }

    #[test]
    fn test_divergence_when_predictions_differ() {
        let b = result(Prediction::Ai, 90.0, 10.0);
        let n = result(Prediction::Human, 40.0, 60.0);

        let outcome = compare(&b, &n);
        assert!(!outcome.consensus);
        assert_eq!(outcome.winning_model, ModelId::B);
        assert_eq!(outcome.ai_probability_delta, 50.0);
    }

    #[test]
    fn test_winner_has_larger_confidence() {
        let b = result(Prediction::Human, 30.0, 70.0);
        let n = result(Prediction::Human, 5.0, 95.0);
        assert_eq!(compare(&b, &n).winning_model, ModelId::N);
    }

    #[test]
    fn test_equal_confidence_resolves_to_first_argument() {
        let b = result(Prediction::Ai, 75.0, 25.0);
        let n = result(Prediction::Human, 25.0, 75.0);
        assert_eq!(compare(&b, &n).winning_model, ModelId::B);
    }

    #[test]
    fn test_deltas_are_symmetric() {
        let b = result(Prediction::Ai, 87.5, 12.5);
        let n = result(Prediction::Human, 33.3, 66.7);

        let forward = compare(&b, &n);
        let backward = compare(&n, &b);
        assert_eq!(forward.ai_probability_delta, backward.ai_probability_delta);
        assert_eq!(
            forward.human_probability_delta,
            backward.human_probability_delta
        );
    }

    #[test]
    fn test_display_rounding_keeps_raw_value() {
        let b = result(Prediction::Ai, 66.666, 33.334);
        let n = result(Prediction::Ai, 33.333, 66.667);

        let outcome = compare(&b, &n);
        assert!((outcome.ai_probability_delta - 33.333).abs() < 1e-9);
        assert_eq!(outcome.ai_probability_delta_display(), 33.33);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(0.126), 0.13);
        assert_eq!(round2(50.0), 50.0);
    }
}
