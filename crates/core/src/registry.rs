//! Model registry.
//!
//! Holds the fixed, named collection of scorers for the lifetime of the
//! process. Loading happens once at startup from a `registry.json` manifest
//! plus one artifact file per model; after that the registry is read-only and
//! shared across concurrent requests without locking. Iteration order is the
//! manifest order, so consensus tie-breaks are reproducible.

use crate::constants::MAX_MODELS;
use crate::error::{DiagnosisError, DiagnosisResult};
use crate::scorer::{ModelArtifact, Scorer};
use cardiodx_types::ModelName;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One registered model: its name, display metadata and scorer handle.
#[derive(Debug)]
pub struct ModelEntry {
    name: ModelName,
    family: &'static str,
    reported_accuracy: Option<f64>,
    scorer: Box<dyn Scorer>,
}

impl ModelEntry {
    /// Creates an entry around an already-constructed scorer.
    ///
    /// Registry loading builds entries from artifacts; this constructor is the
    /// seam for collaborator-supplied loaders and for tests.
    pub fn new(name: ModelName, scorer: Box<dyn Scorer>) -> Self {
        Self {
            name,
            family: "external",
            reported_accuracy: None,
            scorer,
        }
    }

    pub fn name(&self) -> &ModelName {
        &self.name
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Accuracy reported by the training pipeline, for display only.
    pub fn reported_accuracy(&self) -> Option<f64> {
        self.reported_accuracy
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

#[derive(Deserialize)]
struct Manifest {
    models: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
struct ManifestEntry {
    name: ModelName,
    file: String,
    #[serde(default)]
    reported_accuracy: Option<f64>,
}

/// The fixed collection of scorers, in manifest order.
#[derive(Debug)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Loads every model named by the manifest in `model_dir`.
    ///
    /// Loading is fail-fast: if any artifact cannot be read, parsed or
    /// validated, the whole load fails and no registry value exists for later
    /// stages to misuse. Reads are scoped, so file handles are released on
    /// success and failure alike.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Directory containing `registry.json` and the artifact
    ///   files it names.
    ///
    /// # Errors
    ///
    /// Returns a `DiagnosisError` if:
    /// - the manifest cannot be read or parsed,
    /// - the manifest registers more than [`MAX_MODELS`] models or names a
    ///   file outside the model directory,
    /// - two models share a name,
    /// - any artifact cannot be read (`ModelsUnavailable`), parsed or
    ///   validated.
    pub fn load(model_dir: &Path) -> DiagnosisResult<Self> {
        let manifest_path = model_dir.join(crate::constants::REGISTRY_MANIFEST_FILENAME);
        let manifest_text = fs::read_to_string(&manifest_path).map_err(DiagnosisError::ManifestRead)?;
        let manifest: Manifest =
            serde_json::from_str(&manifest_text).map_err(DiagnosisError::ManifestParse)?;

        if manifest.models.len() > MAX_MODELS {
            return Err(DiagnosisError::InvalidInput(format!(
                "manifest registers {} models, more than the maximum of {}",
                manifest.models.len(),
                MAX_MODELS
            )));
        }

        let mut entries = Vec::with_capacity(manifest.models.len());
        for spec in manifest.models {
            validate_artifact_filename(&spec.file)?;

            let artifact_path = model_dir.join(&spec.file);
            let artifact_text =
                fs::read_to_string(&artifact_path).map_err(|source| {
                    DiagnosisError::ModelsUnavailable {
                        name: spec.name.to_string(),
                        source,
                    }
                })?;
            let artifact: ModelArtifact = serde_json::from_str(&artifact_text).map_err(|source| {
                DiagnosisError::ModelArtifactInvalid {
                    name: spec.name.to_string(),
                    source,
                }
            })?;

            let family = artifact.family_name();
            let scorer =
                artifact
                    .into_scorer()
                    .map_err(|reason| DiagnosisError::ModelArtifactMalformed {
                        name: spec.name.to_string(),
                        reason,
                    })?;

            tracing::info!(model = %spec.name, family, "loaded model artifact");
            entries.push(ModelEntry {
                name: spec.name,
                family,
                reported_accuracy: spec.reported_accuracy,
                scorer,
            });
        }

        Self::from_entries(entries)
    }

    /// Builds a registry from pre-constructed entries, rejecting duplicates.
    pub fn from_entries(entries: Vec<ModelEntry>) -> DiagnosisResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entries[..index].iter().any(|e| e.name == entry.name) {
                return Err(DiagnosisError::DuplicateModelName(entry.name.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Looks a model up by name.
    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.name == *name)
    }

    /// Iterates the models in registration (manifest) order.
    pub fn all(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_artifact_filename(file: &str) -> DiagnosisResult<()> {
    // Artifact files live flat inside the model directory; a manifest naming
    // a path outside it is configuration damage, not a model to load.
    if file.trim().is_empty() || file.contains('/') || file.contains('\\') || file.contains("..") {
        return Err(DiagnosisError::InvalidInput(format!(
            "artifact filename '{file}' must be a plain filename inside the model directory"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn linear_artifact_json(intercept: f64) -> String {
        format!(
            r#"{{"family":"linear","coefficients":[0,0,0,0,0,0,0,0,0,0,0,0,0],"intercept":{intercept}}}"#
        )
    }

    fn write_model_dir(artifacts: &[(&str, &str)], manifest_models: &str) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (file, contents) in artifacts {
            fs::write(dir.path().join(file), contents).expect("Failed to write artifact");
        }
        fs::write(
            dir.path().join("registry.json"),
            format!(r#"{{"models":[{manifest_models}]}}"#),
        )
        .expect("Failed to write manifest");
        dir
    }

    #[test]
    fn load_preserves_manifest_order() {
        let artifact = linear_artifact_json(0.0);
        let dir = write_model_dir(
            &[
                ("alpha.json", &artifact),
                ("beta.json", &artifact),
            ],
            r#"{"name":"beta","file":"beta.json","reported_accuracy":0.9},
               {"name":"alpha","file":"alpha.json"}"#,
        );

        let registry = ModelRegistry::load(dir.path()).expect("load should succeed");
        let names: Vec<&str> = registry.all().map(|e| e.name().as_str()).collect();
        assert_eq!(names, vec!["beta", "alpha"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("beta").and_then(ModelEntry::reported_accuracy),
            Some(0.9)
        );
        assert!(registry.get("gamma").is_none());
    }

    #[test]
    fn load_fails_fast_when_an_artifact_is_missing() {
        let artifact = linear_artifact_json(0.0);
        let dir = write_model_dir(
            &[("alpha.json", &artifact)],
            r#"{"name":"alpha","file":"alpha.json"},
               {"name":"beta","file":"missing.json"}"#,
        );

        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        match err {
            DiagnosisError::ModelsUnavailable { name, .. } => assert_eq!(name, "beta"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_rejects_duplicate_model_names() {
        let artifact = linear_artifact_json(0.0);
        let dir = write_model_dir(
            &[("alpha.json", &artifact)],
            r#"{"name":"alpha","file":"alpha.json"},
               {"name":"alpha","file":"alpha.json"}"#,
        );

        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        assert!(matches!(err, DiagnosisError::DuplicateModelName(name) if name == "alpha"));
    }

    #[test]
    fn load_rejects_unparseable_artifacts() {
        let dir = write_model_dir(
            &[("alpha.json", "not json at all")],
            r#"{"name":"alpha","file":"alpha.json"}"#,
        );

        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        assert!(matches!(err, DiagnosisError::ModelArtifactInvalid { name, .. } if name == "alpha"));
    }

    #[test]
    fn load_rejects_structurally_invalid_artifacts() {
        let short = r#"{"family":"linear","coefficients":[1.0],"intercept":0}"#;
        let dir = write_model_dir(
            &[("alpha.json", short)],
            r#"{"name":"alpha","file":"alpha.json"}"#,
        );

        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        assert!(
            matches!(err, DiagnosisError::ModelArtifactMalformed { name, .. } if name == "alpha")
        );
    }

    #[test]
    fn load_rejects_artifact_paths_escaping_the_model_dir() {
        let artifact = linear_artifact_json(0.0);
        let dir = write_model_dir(
            &[("alpha.json", &artifact)],
            r#"{"name":"alpha","file":"../alpha.json"}"#,
        );

        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        assert!(matches!(err, DiagnosisError::InvalidInput(_)));
    }

    #[test]
    fn missing_manifest_is_a_manifest_read_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = ModelRegistry::load(dir.path()).expect_err("load should fail");
        assert!(matches!(err, DiagnosisError::ManifestRead(_)));
    }
}
