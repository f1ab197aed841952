//! Inference layer: ONNX Runtime sentence embeddings and a linear SVM classifier.

mod classifier;
mod loader;

pub use classifier::{LinearSvm, MultiClass};
pub use loader::{DEFAULT_CLASSIFIER_PATH, DEFAULT_MODEL_DIR, ModelConfig, load_with_embedder};

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::{EMBED_BATCH_SIZE, OnnxEmbedder};
#[cfg(feature = "onnx")]
pub use loader::load_models;
