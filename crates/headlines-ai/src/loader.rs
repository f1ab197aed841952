//! One-shot model loading shared by the CLI and the HTTP service.

use std::path::PathBuf;

use headlines_core::{Embed, ModelLoadError, Models};
use tracing::info;

use crate::classifier::LinearSvm;

/// Default sentence-transformer directory (ONNX export of all-MiniLM-L6-v2).
pub const DEFAULT_MODEL_DIR: &str = "/opt/huggingface_models/all-MiniLM-L6-v2";

/// Default exported SVM, relative to the working directory.
pub const DEFAULT_CLASSIFIER_PATH: &str = "model/svm_model.json";

/// Where the two model artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub classifier_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            classifier_path: PathBuf::from(DEFAULT_CLASSIFIER_PATH),
        }
    }
}

/// Load the ONNX embedder and the SVM classifier.
///
/// Call once per process; the returned [`Models`] is immutable and can be
/// shared across threads.
#[cfg(feature = "onnx")]
pub fn load_models(config: &ModelConfig) -> Result<Models, ModelLoadError> {
    info!(dir = %config.model_dir.display(), "loading sentence-transformer model");
    let embedder = crate::embedder::OnnxEmbedder::load(&config.model_dir)?;
    load_with_embedder(Box::new(embedder), config)
}

/// Load the classifier and pair it with an already-built embedder.
pub fn load_with_embedder(
    embedder: Box<dyn Embed>,
    config: &ModelConfig,
) -> Result<Models, ModelLoadError> {
    info!(path = %config.classifier_path.display(), "loading SVM classifier");
    let classifier = LinearSvm::load(&config.classifier_path)?;
    let models = Models::new(embedder, Box::new(classifier))?;
    info!("models loaded");
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use headlines_core::Label;

    struct UnitEmbedder(usize);

    impl Embed for UnitEmbedder {
        fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0; self.0]).collect())
        }

        fn dim(&self) -> usize {
            self.0
        }
    }

    fn config_with(dir: &tempfile::TempDir, svm_json: Option<&str>) -> ModelConfig {
        let classifier_path = dir.path().join("svm_model.json");
        if let Some(json) = svm_json {
            std::fs::write(&classifier_path, json).unwrap();
        }
        ModelConfig {
            model_dir: dir.path().to_path_buf(),
            classifier_path,
        }
    }

    #[test]
    fn defaults_point_at_fixed_locations() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.model_dir, PathBuf::from(DEFAULT_MODEL_DIR));
        assert_eq!(cfg.classifier_path, PathBuf::from("model/svm_model.json"));
    }

    #[test]
    fn loads_and_scores() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with(
            &dir,
            Some(r#"{"classes": ["Pessimistic", "Optimistic"], "coef": [[1.0, 1.0]], "intercept": [-1.0]}"#),
        );

        let models = load_with_embedder(Box::new(UnitEmbedder(2)), &cfg).unwrap();
        let labels = models.score(&["Stocks rally", "Markets fall"]).unwrap();
        assert_eq!(labels, vec![Label::from("Optimistic"); 2]);
    }

    #[test]
    fn missing_classifier_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with(&dir, None);
        let err = load_with_embedder(Box::new(UnitEmbedder(2)), &cfg)
            .err()
            .unwrap();
        assert!(matches!(err, ModelLoadError::ClassifierNotFound(_)));
    }

    #[test]
    fn dimension_mismatch_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with(
            &dir,
            Some(r#"{"classes": [0, 1], "coef": [[1.0, 1.0, 1.0]], "intercept": [0.0]}"#),
        );
        let err = load_with_embedder(Box::new(UnitEmbedder(384)), &cfg)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ModelLoadError::DimensionMismatch {
                embedder: 384,
                classifier: 3
            }
        ));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn missing_embedder_fails_before_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with(&dir, None);
        let err = load_models(&cfg).err().unwrap();
        assert!(matches!(err, ModelLoadError::EmbedderNotFound(_)));
    }
}
