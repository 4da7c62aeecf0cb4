use crate::scorer::ScorerError;

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read registry manifest: {0}")]
    ManifestRead(std::io::Error),
    #[error("failed to parse registry manifest: {0}")]
    ManifestParse(serde_json::Error),
    #[error("duplicate model name in registry: {0}")]
    DuplicateModelName(String),
    #[error("models unavailable: failed to read artifact for '{name}': {source}")]
    ModelsUnavailable {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("models unavailable: failed to parse artifact for '{name}': {source}")]
    ModelArtifactInvalid {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("models unavailable: artifact for '{name}' is malformed: {reason}")]
    ModelArtifactMalformed { name: String, reason: String },
    #[error("no model was available to score the request")]
    NoModelAvailable,
    #[error("scorer failed: {0}")]
    Scorer(#[from] ScorerError),
}

pub type DiagnosisResult<T> = std::result::Result<T, DiagnosisError>;
