//! Diagnostic orchestration.
//!
//! Ties the pipeline together for one request: encode the clinical input,
//! score it against every registered model, tier the consensus probability.
//! The service is stateless apart from the shared, read-only registry, so it
//! clones cheaply into concurrent request handlers.

use crate::ensemble::{self, EnsembleResult};
use crate::error::DiagnosisResult;
use crate::features::{encode, FeatureVector};
use crate::input::ClinicalInput;
use crate::registry::ModelRegistry;
use crate::risk::{self, RiskAssessment};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// The full outcome of one diagnostic request.
#[derive(Debug)]
pub struct Diagnosis {
    /// Identifier stamped on the request for logging and audit.
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub features: FeatureVector,
    pub ensemble: EnsembleResult,
    pub risk: RiskAssessment,
}

/// Service running diagnostic requests against the shared model registry.
#[derive(Clone)]
pub struct DiagnosticService {
    registry: Arc<ModelRegistry>,
}

impl DiagnosticService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Runs one diagnostic request.
    ///
    /// # Arguments
    ///
    /// * `input` - The thirteen patient-entered clinical attributes.
    ///
    /// # Returns
    ///
    /// Returns the per-model verdicts, the consensus probability and
    /// confidence, and the derived risk tier with its recommendation.
    ///
    /// # Errors
    ///
    /// Returns `DiagnosisError::NoModelAvailable` if every registered model
    /// failed for this request; no risk tier is produced in that case.
    pub fn diagnose(&self, input: &ClinicalInput) -> DiagnosisResult<Diagnosis> {
        let id = Uuid::new_v4();
        let features = encode(input);
        let ensemble = ensemble::score(&features, &self.registry)?;
        let risk = risk::classify(ensemble.consensus_probability);

        tracing::info!(
            diagnosis_id = %id,
            tier = risk.tier.label(),
            consensus_probability = ensemble.consensus_probability,
            confidence = ensemble.confidence,
            models = ensemble.outputs.len(),
            failures = ensemble.failures.len(),
            "diagnosis complete"
        );

        Ok(Diagnosis {
            id,
            generated_at: Utc::now(),
            features,
            ensemble,
            risk,
        })
    }
}
