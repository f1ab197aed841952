//! Linear support-vector classifier for headline embeddings.
//!
//! The fitted model is exported as JSON with the class list, the weight rows
//! of its decision functions, and the matching intercepts:
//!
//! ```json
//! { "classes": ["Optimistic", "Pessimistic"], "coef": [[0.12, ...]], "intercept": [-0.3] }
//! ```
//!
//! Two classes use a single decision function: positive picks `classes[1]`,
//! otherwise `classes[0]`. More classes must say how the rows are laid out
//! with `"multi_class"`:
//!
//! - `"ovr"`: one row per class, the highest decision value wins.
//! - `"ovo"`: one row per class pair `(i, j)`, `i < j`, in the order
//!   `(0,1), (0,2), .., (1,2), ..`. A positive decision is a vote for `i`,
//!   anything else a vote for `j`; the most votes wins.
//!
//! Ties go to the lowest class index in both layouts.

use std::path::Path;

use headlines_core::{Classify, Label, ModelLoadError};
use serde::Deserialize;
use tracing::info;

/// On-disk layout of an exported linear SVM.
#[derive(Debug, Deserialize)]
struct SvmFile {
    classes: Vec<Label>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    multi_class: Option<MultiClass>,
}

/// How the weight rows of a classifier with more than two classes combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// One-vs-rest: one row per class.
    Ovr,
    /// One-vs-one: one row per class pair, combined by voting.
    Ovo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Binary,
    Multi(MultiClass),
}

/// A fitted linear SVM. Immutable after loading.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    classes: Vec<Label>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    decision: Decision,
    dim: usize,
}

impl LinearSvm {
    /// Load and validate an exported classifier file.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::ClassifierNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ModelLoadError::ClassifierRead {
            path: path.to_path_buf(),
            source,
        })?;
        let svm = Self::from_json(&text)?;
        info!(
            classes = svm.classes.len(),
            dim = svm.dim,
            path = %path.display(),
            "loaded SVM classifier"
        );
        Ok(svm)
    }

    /// Parse and validate a classifier from its JSON export.
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let file: SvmFile = serde_json::from_str(json)?;
        Self::new(file.classes, file.coef, file.intercept, file.multi_class)
    }

    /// Build a classifier from its parts, checking they fit together.
    ///
    /// `multi_class` is required for more than two classes and ignored for two.
    pub fn new(
        classes: Vec<Label>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
        multi_class: Option<MultiClass>,
    ) -> Result<Self, ModelLoadError> {
        let invalid = |msg: String| Err(ModelLoadError::InvalidClassifier(msg));

        let n = classes.len();
        if n < 2 {
            return invalid(format!("need at least 2 classes, got {n}"));
        }
        let decision = match (n, multi_class) {
            (2, _) => Decision::Binary,
            (_, Some(layout)) => Decision::Multi(layout),
            (_, None) => {
                return invalid(format!(
                    r#"{n} classes need "multi_class": "ovr" or "ovo""#
                ));
            }
        };
        let expected_rows = match decision {
            Decision::Binary => 1,
            Decision::Multi(MultiClass::Ovr) => n,
            Decision::Multi(MultiClass::Ovo) => n * (n - 1) / 2,
        };
        if coef.len() != expected_rows {
            return invalid(format!(
                "{n} classes need {expected_rows} weight rows, got {}",
                coef.len()
            ));
        }
        if intercept.len() != coef.len() {
            return invalid(format!(
                "{} weight rows but {} intercepts",
                coef.len(),
                intercept.len()
            ));
        }
        let dim = coef[0].len();
        if dim == 0 {
            return invalid("weight rows are empty".to_string());
        }
        if let Some(row) = coef.iter().position(|r| r.len() != dim) {
            return invalid(format!(
                "weight row {row} has length {}, expected {dim}",
                coef[row].len()
            ));
        }

        Ok(Self {
            classes,
            coef,
            intercept,
            decision,
            dim,
        })
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Raw decision values for one embedding, one per weight row.
    pub fn decision_function(&self, x: &[f32]) -> anyhow::Result<Vec<f64>> {
        anyhow::ensure!(
            x.len() == self.dim,
            "embedding has {} dimensions, classifier expects {}",
            x.len(),
            self.dim
        );
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(w, b)| dot(w, x) + b)
            .collect())
    }

    /// Predict the label for one embedding.
    pub fn predict(&self, x: &[f32]) -> anyhow::Result<Label> {
        let scores = self.decision_function(x)?;
        let idx = match self.decision {
            Decision::Binary => usize::from(scores[0] > 0.0),
            Decision::Multi(MultiClass::Ovr) => argmax(&scores),
            Decision::Multi(MultiClass::Ovo) => {
                argmax(&pairwise_votes(&scores, self.classes.len()))
            }
        };
        Ok(self.classes[idx].clone())
    }
}

impl Classify for LinearSvm {
    fn classify(&self, embeddings: &[Vec<f32>]) -> anyhow::Result<Vec<Label>> {
        embeddings.iter().map(|x| self.predict(x)).collect()
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

fn dot(w: &[f64], x: &[f32]) -> f64 {
    w.iter().zip(x).map(|(a, &b)| a * f64::from(b)).sum()
}

/// Tally one-vs-one decisions, in pair order, into per-class votes.
fn pairwise_votes(scores: &[f64], n_classes: usize) -> Vec<f64> {
    let mut votes = vec![0.0; n_classes];
    let pairs = (0..n_classes).flat_map(|i| (i + 1..n_classes).map(move |j| (i, j)));
    for ((i, j), &score) in pairs.zip(scores) {
        if score > 0.0 {
            votes[i] += 1.0;
        } else {
            votes[j] += 1.0;
        }
    }
    votes
}

/// Index of the largest value; the first one wins on ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
