use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring up the embedding model or the classifier.
///
/// Always fatal: a process that hits this never reaches a serving state.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("embedding model not found: {0}")]
    EmbedderNotFound(PathBuf),

    #[error("failed to initialise embedding model: {0}")]
    Embedder(#[source] anyhow::Error),

    #[error("classifier file not found: {0}")]
    ClassifierNotFound(PathBuf),

    #[error("failed to read classifier file {path}: {source}")]
    ClassifierRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialise classifier: {0}")]
    ClassifierParse(#[from] serde_json::Error),

    #[error("invalid classifier: {0}")]
    InvalidClassifier(String),

    #[error("embedding dimension {embedder} does not match classifier dimension {classifier}")]
    DimensionMismatch { embedder: usize, classifier: usize },
}

/// Failure to obtain headlines from a file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage in which a scoring failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embed,
    Classify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embed => "embed",
            Self::Classify => "classify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure raised while embedding or classifying a batch.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct ScoringError {
    pub stage: Stage,
    #[source]
    pub source: anyhow::Error,
}

impl ScoringError {
    pub fn new(stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Failure to write a score file.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed score line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}
