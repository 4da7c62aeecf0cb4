//! Feature encoding.
//!
//! Transforms a [`ClinicalInput`] into the fixed-order numeric vector the
//! registered classifiers were trained against. The field order below is the
//! training-time column order; scorers index into it by position, so the name
//! table and the encoder live side by side to keep them from drifting apart.

use crate::input::ClinicalInput;

/// Number of features every registered model expects.
pub const FEATURE_COUNT: usize = 13;

/// Training-time feature names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// An encoded, model-ready feature vector.
///
/// Immutable once built; scorers read it through [`FeatureVector::values`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Returns the encoded values in training-time order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Looks up a single encoded value by its training-time column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

/// Encodes raw clinical attributes into a model-ready feature vector.
///
/// Total function: every categorical field already carries a code from its
/// enumerated domain, and numeric fields pass through unchanged, so encoding
/// cannot fail.
pub fn encode(input: &ClinicalInput) -> FeatureVector {
    FeatureVector {
        values: [
            f64::from(input.age),
            f64::from(input.sex.code()),
            f64::from(input.chest_pain.code()),
            f64::from(input.resting_bp),
            f64::from(input.cholesterol),
            if input.fasting_blood_sugar { 1.0 } else { 0.0 },
            f64::from(input.resting_ecg.code()),
            f64::from(input.max_heart_rate),
            if input.exercise_angina { 1.0 } else { 0.0 },
            input.st_depression,
            f64::from(input.st_slope.code()),
            f64::from(input.major_vessels),
            f64::from(input.thalassemia.code()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ChestPainType, RestingEcg, Sex, StSlope, Thalassemia};

    fn sample_input() -> ClinicalInput {
        ClinicalInput {
            age: 57,
            sex: Sex::from_label("male"),
            chest_pain: ChestPainType::from_label("asymptomatic"),
            resting_bp: 140,
            cholesterol: 241,
            fasting_blood_sugar: false,
            resting_ecg: RestingEcg::from_label("ST-T abnormality"),
            max_heart_rate: 123,
            exercise_angina: true,
            st_depression: 0.2,
            st_slope: StSlope::from_label("flat"),
            major_vessels: 0,
            thalassemia: Thalassemia::from_label("reversible defect"),
        }
    }

    #[test]
    fn encoding_matches_training_tables_field_for_field() {
        let vector = encode(&sample_input());
        assert_eq!(
            vector.values(),
            &[
                57.0, 1.0, 3.0, 140.0, 241.0, 0.0, 1.0, 123.0, 1.0, 0.2, 1.0, 0.0, 7.0
            ]
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let input = sample_input();
        assert_eq!(encode(&input), encode(&input));
    }

    #[test]
    fn named_lookup_follows_column_order() {
        let vector = encode(&sample_input());
        assert_eq!(vector.get("age"), Some(57.0));
        assert_eq!(vector.get("thal"), Some(7.0));
        assert_eq!(vector.get("oldpeak"), Some(0.2));
        assert_eq!(vector.get("nonexistent"), None);
    }

    #[test]
    fn boolean_flags_encode_as_unit_codes() {
        let mut input = sample_input();
        input.fasting_blood_sugar = true;
        input.exercise_angina = false;
        let vector = encode(&input);
        assert_eq!(vector.get("fbs"), Some(1.0));
        assert_eq!(vector.get("exang"), Some(0.0));
    }

    #[test]
    fn feature_name_table_has_one_entry_per_field() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        let vector = encode(&sample_input());
        assert_eq!(vector.values().len(), FEATURE_COUNT);
    }
}
