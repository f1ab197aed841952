use std::path::PathBuf;

use clap::Parser;
use headlines_ai::{DEFAULT_CLASSIFIER_PATH, DEFAULT_MODEL_DIR, ModelConfig};
use tracing_subscriber::EnvFilter;

mod score;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Score news headlines with the sentiment classifier.
#[derive(Parser, Debug, Clone)]
#[command(name = "score-headlines", version)]
pub struct Args {
    /// Text file with one headline per line
    pub input_file: PathBuf,

    /// Source name embedded in the output file name (e.g. nyt, chicagotribune)
    pub source: String,

    /// Directory holding the sentence-transformer `model.onnx` and `tokenizer.json`
    #[arg(long, env = "HEADLINES_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Exported SVM classifier (JSON)
    #[arg(long, env = "HEADLINES_CLASSIFIER", default_value = DEFAULT_CLASSIFIER_PATH)]
    pub classifier: PathBuf,

    /// Directory the score file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Args {
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model_dir: self.model_dir.clone(),
            classifier_path: self.classifier.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    score::run(&args)?;
    Ok(())
}
