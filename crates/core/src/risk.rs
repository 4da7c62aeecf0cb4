//! Risk tiering.
//!
//! Maps a consensus probability to one of three discrete tiers, each with a
//! one-line recommendation and a detailed guidance bundle. Thresholds are
//! closed at the lower bound: exactly 0.70 is HIGH and exactly 0.30 is
//! MODERATE.

use serde::Serialize;

/// Probability at or above which the risk is HIGH.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Probability at or above which the risk is at least MODERATE.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.30;

/// Discrete risk bucket derived from the consensus probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    /// Tiers a consensus probability. Pure and deterministic.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if probability >= MODERATE_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Short machine-readable name for the tier.
    pub fn name(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }

    /// Display label for the tier.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high risk",
            Self::Moderate => "moderate risk",
            Self::Low => "low risk",
        }
    }

    /// One-line recommendation attached to the tier.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::High => "An urgent cardiology consultation is recommended.",
            Self::Moderate => "Medical follow-up and further testing are advised.",
            Self::Low => "Continue to maintain a healthy lifestyle and regular check-ups.",
        }
    }

    /// Detailed guidance bundle shown alongside the recommendation.
    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            Self::High => &[
                "Cardiology consultation within 24-48 hours",
                "ECG and echocardiography",
                "Full blood work-up (troponins, BNP)",
                "Avoid intense physical exertion",
                "Monitor symptoms (chest pain, breathlessness)",
            ],
            Self::Moderate => &[
                "Consultation with your primary care physician",
                "Exercise stress test if appropriate",
                "Review of cardiovascular risk factors",
                "Adoption of a healthier lifestyle",
                "Regular monitoring of blood pressure and cholesterol",
            ],
            Self::Low => &[
                "Regular physical activity (150 minutes per week)",
                "Balanced diet (Mediterranean style)",
                "Weight control",
                "Smoking cessation where applicable",
                "Stress management",
                "Annual medical check-ups",
            ],
        }
    }
}

/// A tier together with its recommendation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub recommendation: &'static str,
}

/// Classifies a consensus probability into a tier plus recommendation.
pub fn classify(probability: f64) -> RiskAssessment {
    let tier = RiskTier::from_probability(probability);
    RiskAssessment {
        tier,
        recommendation: tier.recommendation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_belong_to_the_higher_tier() {
        assert_eq!(RiskTier::from_probability(0.70), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.6999), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.30), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.2999), RiskTier::Low);
    }

    #[test]
    fn extremes_tier_as_expected() {
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
    }

    #[test]
    fn classify_carries_the_tier_recommendation() {
        let assessment = classify(0.85);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.recommendation, RiskTier::High.recommendation());
    }

    #[test]
    fn every_tier_has_a_guidance_bundle() {
        for tier in [RiskTier::High, RiskTier::Moderate, RiskTier::Low] {
            assert!(!tier.guidance().is_empty());
            assert!(!tier.label().is_empty());
        }
    }
}
