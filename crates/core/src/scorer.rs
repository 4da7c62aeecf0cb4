//! Pre-trained binary classifiers.
//!
//! A scorer is an opaque, immutable classifier exposing class and probability
//! prediction over one encoded [`FeatureVector`]. Scorers are deserialized
//! from JSON artifacts produced by the training pipeline; the two families
//! here cover the shipped models: `linear` for the logistic regression and
//! `tree_ensemble` for the boosted (CatBoost, XGBoost) and bagged (random
//! forest) tree dumps. Artifacts are validated when loaded so a structural
//! problem surfaces at startup rather than mid-request.

use crate::constants::DEFAULT_DECISION_THRESHOLD;
use crate::features::{FeatureVector, FEATURE_COUNT};
use serde::Deserialize;

/// Errors a scorer can produce while evaluating a feature vector.
///
/// These are recovered per model by the ensemble aggregator; one scorer
/// failing never aborts the remaining models.
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("split references feature index {index}, outside the {FEATURE_COUNT}-feature vector")]
    FeatureIndexOutOfRange { index: usize },
    #[error("tree walk did not reach a leaf within {steps} steps")]
    MalformedTree { steps: usize },
    #[error("model produced a non-finite probability")]
    NonFiniteProbability,
}

/// A named, pre-trained binary classifier.
///
/// Implementations are immutable after construction and safe to share across
/// concurrent requests.
pub trait Scorer: Send + Sync + std::fmt::Debug {
    /// Predicted class: 1 when heart disease is indicated, 0 otherwise.
    fn predict(&self, features: &FeatureVector) -> Result<u8, ScorerError>;

    /// Probability of the positive (disease) class, in `[0, 1]`.
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ScorerError>;
}

/// Feature standardisation parameters fitted at training time.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// Logistic-regression scorer: standardise, dot with the coefficients, squash.
#[derive(Debug)]
pub struct LinearScorer {
    coefficients: Vec<f64>,
    intercept: f64,
    scaler: Option<Scaler>,
    decision_threshold: f64,
}

impl Scorer for LinearScorer {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ScorerError> {
        let probability = self.predict_probability(features)?;
        Ok(u8::from(probability >= self.decision_threshold))
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ScorerError> {
        let values = features.values();
        let mut z = self.intercept;
        for (index, coefficient) in self.coefficients.iter().enumerate() {
            let x = match &self.scaler {
                Some(scaler) => (values[index] - scaler.mean[index]) / scaler.std[index],
                None => values[index],
            };
            z += coefficient * x;
        }
        finite_probability(sigmoid(z))
    }
}

/// How the per-tree outputs of a [`TreeEnsembleScorer`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: leaves are log-odds contributions, summed with the
    /// base score and squashed through the sigmoid.
    SumLogit,
    /// Random forest: leaves are per-tree probabilities, averaged.
    AverageProbability,
}

/// One node of a decision tree stored as a flat array.
///
/// Split children always point forward in the array (validated at load), so
/// evaluation terminates in at most `nodes.len()` steps.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single decision tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walks the tree from the root; `x < threshold` routes left.
    fn evaluate(&self, values: &[f64; FEATURE_COUNT]) -> Result<f64, ScorerError> {
        let mut index = 0usize;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = values
                        .get(*feature)
                        .copied()
                        .ok_or(ScorerError::FeatureIndexOutOfRange { index: *feature })?;
                    index = if x < *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ScorerError::MalformedTree {
            steps: self.nodes.len(),
        })
    }
}

/// Decision-tree ensemble scorer covering boosted and bagged models.
#[derive(Debug)]
pub struct TreeEnsembleScorer {
    trees: Vec<Tree>,
    aggregation: Aggregation,
    base_score: f64,
    decision_threshold: f64,
}

impl Scorer for TreeEnsembleScorer {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ScorerError> {
        let probability = self.predict_probability(features)?;
        Ok(u8::from(probability >= self.decision_threshold))
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ScorerError> {
        let values = features.values();
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(values)?;
        }
        let probability = match self.aggregation {
            Aggregation::SumLogit => sigmoid(self.base_score + sum),
            Aggregation::AverageProbability => sum / self.trees.len() as f64,
        };
        finite_probability(probability)
    }
}

/// On-disk model artifact, internally tagged by family.
#[derive(Debug, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        scaler: Option<Scaler>,
        #[serde(default = "default_decision_threshold")]
        decision_threshold: f64,
    },
    TreeEnsemble {
        trees: Vec<Tree>,
        aggregation: Aggregation,
        #[serde(default)]
        base_score: f64,
        #[serde(default = "default_decision_threshold")]
        decision_threshold: f64,
    },
}

impl ModelArtifact {
    /// Family name for display alongside the model.
    pub fn family_name(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    /// Validates the artifact and turns it into a ready-to-score handle.
    ///
    /// # Errors
    ///
    /// Returns a description of the structural problem if:
    /// - the coefficient or scaler vectors do not cover all features,
    /// - a scaler standard deviation is zero or non-finite,
    /// - the ensemble has no trees, a tree has no nodes, a split references a
    ///   feature outside the vector, or a child index does not point forward.
    pub fn into_scorer(self) -> Result<Box<dyn Scorer>, String> {
        match self {
            Self::Linear {
                coefficients,
                intercept,
                scaler,
                decision_threshold,
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "expected {FEATURE_COUNT} coefficients, found {}",
                        coefficients.len()
                    ));
                }
                if let Some(scaler) = &scaler {
                    if scaler.mean.len() != FEATURE_COUNT || scaler.std.len() != FEATURE_COUNT {
                        return Err(format!(
                            "scaler must carry {FEATURE_COUNT} means and standard deviations"
                        ));
                    }
                    if scaler.std.iter().any(|s| !s.is_finite() || *s == 0.0) {
                        return Err("scaler standard deviations must be finite and non-zero".into());
                    }
                }
                Ok(Box::new(LinearScorer {
                    coefficients,
                    intercept,
                    scaler,
                    decision_threshold,
                }))
            }
            Self::TreeEnsemble {
                trees,
                aggregation,
                base_score,
                decision_threshold,
            } => {
                if trees.is_empty() {
                    return Err("tree ensemble has no trees".into());
                }
                for (tree_index, tree) in trees.iter().enumerate() {
                    validate_tree(tree_index, tree)?;
                }
                Ok(Box::new(TreeEnsembleScorer {
                    trees,
                    aggregation,
                    base_score,
                    decision_threshold,
                }))
            }
        }
    }
}

fn validate_tree(tree_index: usize, tree: &Tree) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err(format!("tree {tree_index} has no nodes"));
    }
    for (node_index, node) in tree.nodes.iter().enumerate() {
        if let TreeNode::Split {
            feature,
            left,
            right,
            ..
        } = node
        {
            if *feature >= FEATURE_COUNT {
                return Err(format!(
                    "tree {tree_index} node {node_index} splits on feature {feature}, outside the {FEATURE_COUNT}-feature vector"
                ));
            }
            if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                return Err(format!(
                    "tree {tree_index} node {node_index} references a child outside the tree"
                ));
            }
            if *left <= node_index || *right <= node_index {
                return Err(format!(
                    "tree {tree_index} node {node_index} has a child that does not point forward"
                ));
            }
        }
    }
    Ok(())
}

fn default_decision_threshold() -> f64 {
    DEFAULT_DECISION_THRESHOLD
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn finite_probability(probability: f64) -> Result<f64, ScorerError> {
    if probability.is_finite() {
        Ok(probability)
    } else {
        Err(ScorerError::NonFiniteProbability)
    }
}
