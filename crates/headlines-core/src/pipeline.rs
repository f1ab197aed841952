//! Model-serving contract: the embed/classify capabilities, the process-wide
//! model handle, and the scoring pipeline shared by every entry point.

use tracing::{debug, info};

use crate::error::{ModelLoadError, ScoringError, Stage};
use crate::label::{Label, ScoredHeadline};

/// Text → fixed-length vector.
///
/// Implementations must not mutate observable state: the same batch always
/// yields the same vectors, and calls may come from several threads at once.
pub trait Embed: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in input order.
    ///
    /// Sub-batching, if any, is the implementation's concern.
    fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Length of every vector this embedder produces.
    fn dim(&self) -> usize;
}

/// Vector → discrete label.
pub trait Classify: Send + Sync {
    /// Predict one label per embedding, in input order.
    fn classify(&self, embeddings: &[Vec<f32>]) -> anyhow::Result<Vec<Label>>;

    /// Vector length the classifier was fitted on.
    fn dim(&self) -> usize;
}

/// The two loaded models, created once per process and shared read-only.
pub struct Models {
    embedder: Box<dyn Embed>,
    classifier: Box<dyn Classify>,
}

impl Models {
    /// Pair an embedder with a classifier, rejecting a dimension mismatch.
    pub fn new(
        embedder: Box<dyn Embed>,
        classifier: Box<dyn Classify>,
    ) -> Result<Self, ModelLoadError> {
        if embedder.dim() != classifier.dim() {
            return Err(ModelLoadError::DimensionMismatch {
                embedder: embedder.dim(),
                classifier: classifier.dim(),
            });
        }
        Ok(Self {
            embedder,
            classifier,
        })
    }

    pub fn embedder(&self) -> &dyn Embed {
        self.embedder.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classify {
        self.classifier.as_ref()
    }

    /// Score a batch of headlines. See [`score`].
    pub fn score<S: AsRef<str>>(&self, headlines: &[S]) -> Result<Vec<Label>, ScoringError> {
        score(headlines, self.embedder(), self.classifier())
    }

    /// Score a batch and pair every label with the headline it came from.
    pub fn score_pairs(&self, headlines: Vec<String>) -> Result<Vec<ScoredHeadline>, ScoringError> {
        let labels = self.score(&headlines)?;
        Ok(labels
            .into_iter()
            .zip(headlines)
            .map(|(label, headline)| ScoredHeadline { label, headline })
            .collect())
    }
}

/// Embed every headline in one batched call, then classify the whole batch.
///
/// Returns exactly one label per headline, in input order. An empty batch
/// returns an empty result without touching either model.
pub fn score<S: AsRef<str>>(
    headlines: &[S],
    embedder: &dyn Embed,
    classifier: &dyn Classify,
) -> Result<Vec<Label>, ScoringError> {
    if headlines.is_empty() {
        debug!("empty batch, nothing to score");
        return Ok(vec![]);
    }

    let texts: Vec<&str> = headlines.iter().map(AsRef::as_ref).collect();
    let count = texts.len();

    info!(count, "embedding headlines");
    let embeddings = embedder
        .embed(&texts)
        .map_err(|e| ScoringError::new(Stage::Embed, e))?;
    if embeddings.len() != count {
        return Err(ScoringError::new(
            Stage::Embed,
            anyhow::anyhow!("embedder returned {} vectors for {count} inputs", embeddings.len()),
        ));
    }

    info!(count, "classifying embeddings");
    let labels = classifier
        .classify(&embeddings)
        .map_err(|e| ScoringError::new(Stage::Classify, e))?;
    if labels.len() != count {
        return Err(ScoringError::new(
            Stage::Classify,
            anyhow::anyhow!("classifier returned {} labels for {count} inputs", labels.len()),
        ));
    }

    Ok(labels)
}
