use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use headlines_ai::{DEFAULT_CLASSIFIER_PATH, DEFAULT_MODEL_DIR, ModelConfig};

/// Server configuration, from flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "headlines-server", version, about = "Serve headline scores over HTTP")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HEADLINES_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HEADLINES_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the sentence-transformer `model.onnx` and `tokenizer.json`
    #[arg(long, env = "HEADLINES_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Exported SVM classifier (JSON)
    #[arg(long, env = "HEADLINES_CLASSIFIER", default_value = DEFAULT_CLASSIFIER_PATH)]
    pub classifier: PathBuf,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid host address '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model_dir: self.model_dir.clone(),
            classifier_path: self.classifier.clone(),
        }
    }
}
