//! Constants used throughout the CardioDx core crate.
//!
//! This module contains the fixed names and policy constants so that
//! consensus selection and artifact resolution stay consistent across the
//! codebase.

/// Directory name for model artifacts.
pub const MODEL_DIR_NAME: &str = "models";

/// Filename of the registry manifest inside the model directory.
pub const REGISTRY_MANIFEST_FILENAME: &str = "registry.json";

/// Name of the designated most-trusted model. When this model produces a
/// probability it is used as the consensus; otherwise the first successful
/// model in registry order is used instead.
pub const PRIMARY_MODEL_NAME: &str = "catboost";

/// Confidence asserted when only one model produced a probability and no
/// disagreement signal is available.
pub const SINGLE_MODEL_CONFIDENCE: f64 = 0.95;

/// Probability at or above which a scorer predicts the positive class, unless
/// the artifact overrides it.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Upper bound on the number of models a manifest may register.
pub const MAX_MODELS: usize = 16;
