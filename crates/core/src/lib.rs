//! # CardioDx Core
//!
//! Core scoring logic for the CardioDx cardiac risk system.
//!
//! This crate contains the deterministic diagnostic pipeline:
//! - Feature encoding of patient-entered clinical attributes
//! - The fixed, named registry of pre-trained classifiers
//! - Ensemble aggregation with per-model failure isolation
//! - Risk tiering of the consensus probability
//!
//! **No API concerns**: HTTP servers, serialisation of request/response
//! payloads, or CLI parsing belong in `api-rest`, `api-shared`, and
//! `cardiodx-cli`.

pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod input;
pub mod registry;
pub mod risk;
pub mod scorer;

pub use config::{resolve_model_dir, CoreConfig};
pub use constants::{PRIMARY_MODEL_NAME, SINGLE_MODEL_CONFIDENCE};
pub use diagnosis::{Diagnosis, DiagnosticService};
pub use ensemble::{EnsembleResult, ModelFailure, ModelOutput};
pub use error::{DiagnosisError, DiagnosisResult};
pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use input::{ChestPainType, ClinicalInput, RestingEcg, Sex, StSlope, Thalassemia};
pub use registry::{ModelEntry, ModelRegistry};
pub use risk::{classify, RiskAssessment, RiskTier};
pub use scorer::{Scorer, ScorerError};
