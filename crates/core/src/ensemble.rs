//! Ensemble aggregation.
//!
//! Runs every registered scorer against one encoded feature vector and
//! reduces the per-model outputs to two scalars: the consensus probability
//! (primary-model-with-fallback) and an inter-model agreement measure. One
//! model failing is recorded and excluded; it never aborts the rest.

use crate::constants::{PRIMARY_MODEL_NAME, SINGLE_MODEL_CONFIDENCE};
use crate::error::{DiagnosisError, DiagnosisResult};
use crate::features::FeatureVector;
use crate::registry::ModelRegistry;
use crate::scorer::ScorerError;

/// One model's successful verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub name: String,
    /// 1 when heart disease is indicated.
    pub predicted_class: u8,
    pub probability: f64,
}

/// One model's recorded failure, kept visible in the comparison output
/// rather than silently dropped.
#[derive(Debug)]
pub struct ModelFailure {
    pub name: String,
    pub error: ScorerError,
}

/// Aggregated result of one diagnostic request.
///
/// Created fresh per request; not persisted. `outputs` and `failures`
/// together cover every registered model, in registry order.
#[derive(Debug)]
pub struct EnsembleResult {
    pub outputs: Vec<ModelOutput>,
    pub failures: Vec<ModelFailure>,
    /// Probability of the primary model when it succeeded, otherwise of the
    /// first successful model in registry order.
    pub consensus_probability: f64,
    /// `1 − population std dev` of the successful probabilities, or the
    /// asserted single-model constant. Reported unclamped: a value outside
    /// `[0, 1]` means some model returned degenerate probabilities.
    pub confidence: f64,
}

/// Scores one feature vector against every model in the registry.
///
/// # Errors
///
/// Returns `DiagnosisError::NoModelAvailable` if no model produced a verdict;
/// per-model failures short of that are recorded in the result instead.
pub fn score(features: &FeatureVector, registry: &ModelRegistry) -> DiagnosisResult<EnsembleResult> {
    let mut outputs = Vec::with_capacity(registry.len());
    let mut failures = Vec::new();

    for entry in registry.all() {
        let verdict = entry
            .scorer()
            .predict(features)
            .and_then(|class| {
                entry
                    .scorer()
                    .predict_probability(features)
                    .map(|probability| (class, probability))
            });
        match verdict {
            Ok((predicted_class, probability)) => outputs.push(ModelOutput {
                name: entry.name().to_string(),
                predicted_class,
                probability,
            }),
            Err(error) => {
                tracing::warn!(model = %entry.name(), %error, "model invocation failed, excluding from consensus");
                failures.push(ModelFailure {
                    name: entry.name().to_string(),
                    error,
                });
            }
        }
    }

    let consensus_probability =
        select_consensus(&outputs).ok_or(DiagnosisError::NoModelAvailable)?;

    let probabilities: Vec<f64> = outputs.iter().map(|o| o.probability).collect();
    let confidence = agreement_confidence(&probabilities);
    if !(0.0..=1.0).contains(&confidence) {
        tracing::warn!(
            confidence,
            "confidence outside [0, 1]; a model returned degenerate probabilities"
        );
    }

    Ok(EnsembleResult {
        outputs,
        failures,
        consensus_probability,
        confidence,
    })
}

/// Picks the authoritative probability from the ordered successful outputs:
/// the model named [`PRIMARY_MODEL_NAME`] when present, else the first.
fn select_consensus(outputs: &[ModelOutput]) -> Option<f64> {
    outputs
        .iter()
        .find(|output| output.name == PRIMARY_MODEL_NAME)
        .or_else(|| outputs.first())
        .map(|output| output.probability)
}

/// Agreement among the successful probabilities.
///
/// With two or more models this is `1 − population std dev`; a lone model
/// carries no disagreement signal, so the constant
/// [`SINGLE_MODEL_CONFIDENCE`] is asserted instead.
fn agreement_confidence(probabilities: &[f64]) -> f64 {
    if probabilities.len() < 2 {
        return SINGLE_MODEL_CONFIDENCE;
    }
    1.0 - population_std_dev(probabilities)
}

/// Population standard deviation (divide by N, not N−1).
fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::encode;
    use crate::input::{ChestPainType, ClinicalInput, RestingEcg, Sex, StSlope, Thalassemia};
    use crate::registry::ModelEntry;
    use crate::scorer::Scorer;
    use cardiodx_types::ModelName;

    const TOLERANCE: f64 = 1e-12;

    /// Test double that always reports the same probability.
    #[derive(Debug)]
    struct FixedScorer {
        probability: f64,
    }

    impl Scorer for FixedScorer {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ScorerError> {
            Ok(u8::from(self.probability >= 0.5))
        }

        fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ScorerError> {
            Ok(self.probability)
        }
    }

    /// Test double that fails on every invocation.
    #[derive(Debug)]
    struct FailingScorer;

    impl Scorer for FailingScorer {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ScorerError> {
            Err(ScorerError::NonFiniteProbability)
        }

        fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ScorerError> {
            Err(ScorerError::NonFiniteProbability)
        }
    }

    fn fixed(name: &str, probability: f64) -> ModelEntry {
        ModelEntry::new(
            ModelName::new(name).expect("name should be non-empty"),
            Box::new(FixedScorer { probability }),
        )
    }

    fn failing(name: &str) -> ModelEntry {
        ModelEntry::new(
            ModelName::new(name).expect("name should be non-empty"),
            Box::new(FailingScorer),
        )
    }

    fn registry(entries: Vec<ModelEntry>) -> ModelRegistry {
        ModelRegistry::from_entries(entries).expect("registry should build")
    }

    fn features() -> FeatureVector {
        encode(&ClinicalInput {
            age: 54,
            sex: Sex::Female,
            chest_pain: ChestPainType::AtypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 160,
            exercise_angina: false,
            st_depression: 0.0,
            st_slope: StSlope::Upsloping,
            major_vessels: 0,
            thalassemia: Thalassemia::Normal,
        })
    }

    #[test]
    fn primary_model_wins_consensus_regardless_of_order() {
        let registry = registry(vec![fixed("xgboost", 0.4), fixed("catboost", 0.9)]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.consensus_probability - 0.9).abs() < TOLERANCE);
    }

    #[test]
    fn first_successful_model_wins_without_the_primary() {
        let registry = registry(vec![fixed("xgboost", 0.4), fixed("random_forest", 0.6)]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.consensus_probability - 0.4).abs() < TOLERANCE);
    }

    #[test]
    fn failed_primary_falls_back_to_first_success() {
        let registry = registry(vec![failing("catboost"), fixed("xgboost", 0.35)]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.consensus_probability - 0.35).abs() < TOLERANCE);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "catboost");
    }

    #[test]
    fn perfect_agreement_yields_full_confidence() {
        let registry = registry(vec![
            fixed("catboost", 0.8),
            fixed("xgboost", 0.8),
            fixed("random_forest", 0.8),
        ]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.confidence - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn single_model_asserts_the_fixed_confidence() {
        let registry = registry(vec![fixed("catboost", 0.6)]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.confidence - 0.95).abs() < TOLERANCE);
    }

    #[test]
    fn confidence_uses_the_population_formula() {
        // Probabilities 0.2 and 0.4: mean 0.3, population std dev 0.1.
        let registry = registry(vec![fixed("catboost", 0.2), fixed("xgboost", 0.4)]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert!((result.confidence - 0.9).abs() < TOLERANCE);
    }

    #[test]
    fn one_failure_among_four_excludes_only_that_model() {
        let registry = registry(vec![
            fixed("catboost", 0.7),
            failing("xgboost"),
            fixed("random_forest", 0.7),
            fixed("logistic_regression", 0.7),
        ]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        assert_eq!(result.outputs.len(), 3);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "xgboost");
        assert!((result.consensus_probability - 0.7).abs() < TOLERANCE);
        assert!((result.confidence - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn all_models_failing_is_a_hard_failure() {
        let registry = registry(vec![failing("catboost"), failing("xgboost")]);
        let err = score(&features(), &registry).expect_err("scoring should fail");
        assert!(matches!(err, DiagnosisError::NoModelAvailable));
    }

    #[test]
    fn outputs_keep_registry_order_for_comparison_display() {
        let registry = registry(vec![
            fixed("logistic_regression", 0.2),
            fixed("catboost", 0.9),
            fixed("xgboost", 0.5),
        ]);
        let result = score(&features(), &registry).expect("scoring should succeed");
        let names: Vec<&str> = result.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["logistic_regression", "catboost", "xgboost"]);
        assert_eq!(result.outputs[1].predicted_class, 1);
        assert_eq!(result.outputs[0].predicted_class, 0);
    }
}
