//! Random forest classifier deserialized from a JSON artifact.
//!
//! Categorical features are ordinal-encoded by their position in the
//! artifact's category list. A split sends `x <= threshold` to the left child.
//! Leaf values are normalised to class distributions, averaged over all trees,
//! and the first class with the highest mean probability is predicted.

use crate::core::{Classifier, FeatureRecord, Label};
use crate::domain::model::FeatureValue;
use crate::utils::error::{CoffeeError, Result};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub format_version: u32,
    pub classes: Vec<i64>,
    pub features: Vec<FeatureSpec>,
    pub trees: Vec<TreeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    Numeric { name: String },
    Categorical { name: String, categories: Vec<String> },
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name } | FeatureSpec::Categorical { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_for(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }
}

/// A validated forest, immutable after construction.
#[derive(Debug, Clone)]
pub struct RandomForest {
    classes: Vec<i64>,
    features: Vec<FeatureSpec>,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let artifact: ForestArtifact = serde_json::from_slice(bytes).map_err(|e| {
            CoffeeError::InvalidArtifactError {
                reason: format!("not a forest artifact: {}", e),
            }
        })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(invalid(format!(
                "unsupported format_version {} (expected {})",
                artifact.format_version, FORMAT_VERSION
            )));
        }
        if artifact.classes.is_empty() {
            return Err(invalid("artifact declares no classes"));
        }
        if artifact.trees.is_empty() {
            return Err(invalid("artifact contains no trees"));
        }

        for column in FeatureRecord::COLUMNS {
            let count = artifact.features.iter().filter(|f| f.name() == column).count();
            if count != 1 {
                return Err(invalid(format!(
                    "feature '{}' must appear exactly once (found {})",
                    column, count
                )));
            }
        }
        if let Some(extra) = artifact
            .features
            .iter()
            .find(|f| !FeatureRecord::COLUMNS.iter().any(|column| *column == f.name()))
        {
            return Err(invalid(format!("unexpected feature '{}'", extra.name())));
        }
        for spec in &artifact.features {
            let numeric = matches!(spec, FeatureSpec::Numeric { .. });
            if numeric != (spec.name() == "altitude") {
                return Err(invalid(format!("feature '{}' has the wrong kind", spec.name())));
            }
        }

        let n_features = artifact.features.len();
        let n_classes = artifact.classes.len();
        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(t, tree)| build_tree(t, tree, n_features, n_classes))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classes: artifact.classes,
            features: artifact.features,
            trees,
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        self.features
            .iter()
            .map(|spec| {
                let value = record.get(spec.name()).ok_or_else(|| {
                    invalid(format!("record has no column '{}'", spec.name()))
                })?;
                match (spec, value) {
                    (FeatureSpec::Numeric { .. }, FeatureValue::Numeric(x)) => Ok(x),
                    (FeatureSpec::Categorical { name, categories }, FeatureValue::Category(label)) => categories
                        .iter()
                        .position(|c| c == label)
                        .map(|code| code as f64)
                        .ok_or_else(|| CoffeeError::UnknownCategoryError {
                            field: name.clone(),
                            value: label.to_string(),
                        }),
                    (spec, _) => Err(invalid(format!(
                        "feature '{}' has a kind that does not match the record column",
                        spec.name()
                    ))),
                }
            })
            .collect()
    }

    /// Mean class distribution over all trees for one record.
    pub fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        let row = self.encode(record)?;
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_for(&row)) {
                *total += p;
            }
        }
        let n = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n).collect())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, record: &FeatureRecord) -> Result<Label> {
        let proba = self.predict_proba(record)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(Label(self.classes[best]))
    }
}

fn invalid(reason: impl Into<String>) -> CoffeeError {
    CoffeeError::InvalidArtifactError {
        reason: reason.into(),
    }
}

fn build_tree(t: usize, tree: TreeSpec, n_features: usize, n_classes: usize) -> Result<Tree> {
    if tree.nodes.is_empty() {
        return Err(invalid(format!("tree {} has no nodes", t)));
    }
    let n_nodes = tree.nodes.len();
    let nodes = tree
        .nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| match node {
            NodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= n_features {
                    return Err(invalid(format!("tree {} node {}: feature index {} out of range", t, i, feature)));
                }
                if !threshold.is_finite() {
                    return Err(invalid(format!("tree {} node {}: threshold is not finite", t, i)));
                }
                // Children must come after their parent so every walk terminates.
                for child in [left, right] {
                    if child <= i || child >= n_nodes {
                        return Err(invalid(format!("tree {} node {}: child index {} is invalid", t, i, child)));
                    }
                }
                Ok(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                })
            }
            NodeSpec::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(invalid(format!(
                        "tree {} node {}: leaf has {} values for {} classes",
                        t,
                        i,
                        value.len(),
                        n_classes
                    )));
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(invalid(format!("tree {} node {}: leaf values must be non-negative", t, i)));
                }
                let sum: f64 = value.iter().sum();
                if sum <= 0.0 {
                    return Err(invalid(format!("tree {} node {}: leaf values sum to zero", t, i)));
                }
                Ok(Node::Leaf {
                    distribution: value.into_iter().map(|v| v / sum).collect(),
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Tree { nodes })
}
