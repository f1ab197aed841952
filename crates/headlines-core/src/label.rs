//! Classifier outputs and the pairing of a label with its headline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discrete class emitted by the classifier.
///
/// Fitted classifiers carry either integer or text classes; both serialize
/// to JSON as their bare value so the HTTP response mirrors the classifier's
/// own class list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Label {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// One headline with the label the classifier assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredHeadline {
    pub label: Label,
    pub headline: String,
}
