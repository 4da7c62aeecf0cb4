//! Request and response payloads shared by the CardioDx API surfaces.
//!
//! Categorical fields travel as raw labels; the REST layer resolves them into
//! their enumerated domains with the encoder's documented fallback, so an
//! unrecognised label degrades to a default code instead of rejecting the
//! request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One diagnostic request: the thirteen clinical attributes as entered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseReq {
    /// Age in years.
    pub age: u32,
    /// "male" or "female".
    pub sex: String,
    /// "typical angina", "atypical angina", "non-anginal pain" or "asymptomatic".
    pub chest_pain: String,
    /// Resting blood pressure in mmHg.
    pub resting_bp: u32,
    /// Serum cholesterol in mg/dl.
    pub cholesterol: u32,
    /// Fasting blood sugar above 120 mg/dl.
    pub fasting_blood_sugar: bool,
    /// "normal", "st-t abnormality" or "lv hypertrophy".
    pub resting_ecg: String,
    /// Maximum heart rate achieved.
    pub max_heart_rate: u32,
    /// Exercise-induced angina.
    pub exercise_angina: bool,
    /// ST depression induced by exercise ("oldpeak").
    pub st_depression: f64,
    /// "upsloping", "flat" or "downsloping".
    pub st_slope: String,
    /// Number of major vessels, 0-4.
    pub major_vessels: u8,
    /// "normal", "fixed defect" or "reversible defect".
    pub thalassemia: String,
}

/// One model's verdict in the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelVerdict {
    pub name: String,
    pub disease_predicted: bool,
    pub probability: f64,
}

/// One model's recorded failure, shown explicitly rather than dropped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelFailureRes {
    pub name: String,
    pub reason: String,
}

/// Full diagnostic response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseRes {
    /// Identifier of this diagnostic request.
    pub request_id: String,
    /// RFC 3339 timestamp of when the diagnosis was produced.
    pub generated_at: String,
    /// "high", "moderate" or "low".
    pub risk_tier: String,
    /// Display label, e.g. "high risk".
    pub risk_label: String,
    pub recommendation: String,
    pub guidance: Vec<String>,
    pub consensus_probability: f64,
    pub confidence: f64,
    pub models: Vec<ModelVerdict>,
    pub failures: Vec<ModelFailureRes>,
}

/// Metadata for one registered model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    pub name: String,
    pub family: String,
    pub reported_accuracy: Option<f64>,
    /// Whether this is the designated most-trusted model.
    pub primary: bool,
}

/// The registered models, in registry order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsRes {
    pub models: Vec<ModelInfo>,
}
