//! Patient-entered clinical attributes.
//!
//! This module defines the raw input record for one diagnostic request and
//! the categorical domains its fields are drawn from. Label parsing is total:
//! a label outside a field's enumerated domain resolves to that field's first
//! (normal) variant with a warning, never an error, so a diagnostic request
//! cannot be rejected because of a misspelt category.

use serde::{Deserialize, Serialize};

/// Patient sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Parses a raw label, falling back to `Female` (code 0) when unmapped.
    pub fn from_label(label: &str) -> Self {
        match normalise(label).as_str() {
            "female" => Self::Female,
            "male" => Self::Male,
            other => fallback("sex", other, Self::Female),
        }
    }

    /// Numeric code used at training time.
    pub fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }
}

/// Chest pain type, four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl ChestPainType {
    /// Parses a raw label, falling back to `TypicalAngina` (code 0).
    pub fn from_label(label: &str) -> Self {
        match normalise(label).as_str() {
            "typical angina" => Self::TypicalAngina,
            "atypical angina" => Self::AtypicalAngina,
            "non-anginal pain" => Self::NonAnginalPain,
            "asymptomatic" => Self::Asymptomatic,
            other => fallback("chest pain type", other, Self::TypicalAngina),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginalPain => 2,
            Self::Asymptomatic => 3,
        }
    }
}

/// Resting electrocardiogram result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestingEcg {
    Normal,
    SttAbnormality,
    LvHypertrophy,
}

impl RestingEcg {
    /// Parses a raw label, falling back to `Normal` (code 0).
    pub fn from_label(label: &str) -> Self {
        match normalise(label).as_str() {
            "normal" => Self::Normal,
            "st-t abnormality" => Self::SttAbnormality,
            "lv hypertrophy" => Self::LvHypertrophy,
            other => fallback("resting ECG", other, Self::Normal),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::SttAbnormality => 1,
            Self::LvHypertrophy => 2,
        }
    }
}

/// Slope of the peak-exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StSlope {
    Upsloping,
    Flat,
    Downsloping,
}

impl StSlope {
    /// Parses a raw label, falling back to `Upsloping` (code 0).
    pub fn from_label(label: &str) -> Self {
        match normalise(label).as_str() {
            "upsloping" => Self::Upsloping,
            "flat" => Self::Flat,
            "downsloping" => Self::Downsloping,
            other => fallback("ST slope", other, Self::Upsloping),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Upsloping => 0,
            Self::Flat => 1,
            Self::Downsloping => 2,
        }
    }
}

/// Thalassemia test result.
///
/// The training data uses the historical UCI codes 3/6/7, not a contiguous
/// range; the discriminants carry the codes directly so the mapping cannot
/// drift from the variant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Thalassemia {
    Normal = 3,
    FixedDefect = 6,
    ReversibleDefect = 7,
}

impl Thalassemia {
    /// Parses a raw label, falling back to `Normal` (code 3).
    pub fn from_label(label: &str) -> Self {
        match normalise(label).as_str() {
            "normal" => Self::Normal,
            "fixed defect" => Self::FixedDefect,
            "reversible defect" => Self::ReversibleDefect,
            other => fallback("thalassemia", other, Self::Normal),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// The thirteen clinical attributes of one diagnostic request, as entered at
/// the input boundary.
///
/// Numeric fields are passed through to the feature vector unchanged;
/// categorical fields are encoded via the tables in
/// [`crate::features::encode`]. Range enforcement on the numeric fields is a
/// form-layer concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalInput {
    /// Age in years.
    pub age: u32,
    pub sex: Sex,
    pub chest_pain: ChestPainType,
    /// Resting blood pressure in mmHg.
    pub resting_bp: u32,
    /// Serum cholesterol in mg/dl.
    pub cholesterol: u32,
    /// Fasting blood sugar above 120 mg/dl.
    pub fasting_blood_sugar: bool,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved during exercise.
    pub max_heart_rate: u32,
    /// Exercise-induced angina.
    pub exercise_angina: bool,
    /// ST depression induced by exercise relative to rest ("oldpeak").
    pub st_depression: f64,
    pub st_slope: StSlope,
    /// Number of major vessels coloured by fluoroscopy, 0-4.
    pub major_vessels: u8,
    pub thalassemia: Thalassemia,
}

fn normalise(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

fn fallback<T>(field: &str, label: &str, default: T) -> T {
    tracing::warn!(field, label, "unmapped category label, using default code");
    default
}
