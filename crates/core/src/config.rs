//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::{MODEL_DIR_NAME, REGISTRY_MANIFEST_FILENAME};
use crate::error::{DiagnosisError, DiagnosisResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    model_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DiagnosisError::InvalidInput` if `model_dir` does not contain
    /// a registry manifest; the registry load would fail later anyway, but
    /// catching it here keeps misconfiguration a startup problem.
    pub fn new(model_dir: PathBuf) -> DiagnosisResult<Self> {
        if !model_dir.join(REGISTRY_MANIFEST_FILENAME).is_file() {
            return Err(DiagnosisError::InvalidInput(format!(
                "model directory {} does not contain {}",
                model_dir.display(),
                REGISTRY_MANIFEST_FILENAME
            )));
        }
        Ok(Self { model_dir })
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

/// Resolve the model directory without reading environment variables.
///
/// If `override_dir` is provided, it must be a directory containing
/// `registry.json`. Otherwise this searches for `models/` relative to the
/// current working directory and then walks up from `CARGO_MANIFEST_DIR`.
pub fn resolve_model_dir(override_dir: Option<PathBuf>) -> DiagnosisResult<PathBuf> {
    fn looks_like_model_dir(path: &Path) -> bool {
        path.join(REGISTRY_MANIFEST_FILENAME).is_file()
    }

    if let Some(model_dir) = override_dir {
        if model_dir.is_dir() && looks_like_model_dir(&model_dir) {
            return Ok(model_dir);
        }
        return Err(DiagnosisError::InvalidInput(format!(
            "model directory override is not a directory containing {REGISTRY_MANIFEST_FILENAME}"
        )));
    }

    let cwd_relative = PathBuf::from(MODEL_DIR_NAME);
    if cwd_relative.is_dir() && looks_like_model_dir(&cwd_relative) {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(MODEL_DIR_NAME);
        if candidate.is_dir() && looks_like_model_dir(&candidate) {
            return Ok(candidate);
        }
    }

    Err(DiagnosisError::InvalidInput(format!(
        "could not locate a {MODEL_DIR_NAME}/ directory containing {REGISTRY_MANIFEST_FILENAME}"
    )))
}
