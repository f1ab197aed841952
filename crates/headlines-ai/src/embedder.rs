//! ONNX Runtime embedding pipeline for sentence-transformers models.
//!
//! Implements mean-pooled embeddings using all-MiniLM-L6-v2 (384 dimensions).
//! The model directory must contain `model.onnx` and `tokenizer.json`.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use headlines_core::{Embed, ModelLoadError};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// Texts per ONNX run; matches the sentence-transformers `encode` default.
pub const EMBED_BATCH_SIZE: usize = 32;

/// Token limit per text (MiniLM's max sequence length).
const MAX_TOKENS: usize = 256;

/// Sentence embedding generator using ONNX Runtime.
///
/// Produces L2-normalized vectors. `Session::run` needs exclusive access, so
/// the session sits behind a mutex; everything else is read-only.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
}

impl OnnxEmbedder {
    /// Load an embedding model from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self, ModelLoadError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(ModelLoadError::EmbedderNotFound(model_path));
        }
        if !tokenizer_path.exists() {
            return Err(ModelLoadError::EmbedderNotFound(tokenizer_path));
        }

        Self::build(&model_path, &tokenizer_path).map_err(ModelLoadError::Embedder)
    }

    fn build(model_path: &Path, tokenizer_path: &Path) -> anyhow::Result<Self> {
        let session = Session::builder()?.commit_from_file(model_path)?;

        // Infer embedding dimension from model output shape.
        let dim = infer_dim(first_output(session.outputs())?.dtype()).unwrap_or(384);

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        // Pad every input in a run to the longest one.
        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dim,
        })
    }

    /// Embed one sub-batch in a single ONNX run.
    fn embed_chunk(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        let rows: Vec<[&[u32]; 3]> = encodings
            .iter()
            .map(|e| [e.get_ids(), e.get_attention_mask(), e.get_type_ids()])
            .collect();
        let inputs = PaddedInputs::pack(&rows);
        let shape = inputs.shape();

        let ids_tensor = Tensor::from_array((shape, inputs.input_ids.clone().into_boxed_slice()))?;
        let mask_tensor =
            Tensor::from_array((shape, inputs.attention_mask.clone().into_boxed_slice()))?;
        let type_tensor =
            Tensor::from_array((shape, inputs.token_type_ids.clone().into_boxed_slice()))?;

        // A panicked run leaves no partial state in the session.
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);

        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;
        anyhow::ensure!(outputs.len() != 0, "embedding model produced no outputs");

        // Token embeddings: [rows, seq_len, dim].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == inputs.rows && dims[2] as usize == self.dim,
            "unexpected output shape: {dims:?}, expected [{}, {}, {}]",
            inputs.rows,
            inputs.seq_len,
            self.dim
        );

        let token_block = dims[1] as usize * self.dim;
        Ok((0..inputs.rows)
            .map(|i| {
                let tokens = &output_data[i * token_block..][..token_block];
                mean_pool(tokens, inputs.mask_row(i), self.dim)
            })
            .collect())
    }
}

/// Tokenizer output widened to `i64` and zero-padded into row-major
/// `[rows, seq_len]` buffers, one per model input.
#[derive(Debug)]
struct PaddedInputs {
    rows: usize,
    seq_len: usize,
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl PaddedInputs {
    /// Each row is `[ids, attention_mask, type_ids]` for one text.
    fn pack(rows: &[[&[u32]; 3]]) -> Self {
        let seq_len = rows.iter().map(|[ids, ..]| ids.len()).max().unwrap_or(0);
        let len = rows.len() * seq_len;
        let mut packed = Self {
            rows: rows.len(),
            seq_len,
            input_ids: vec![0; len],
            attention_mask: vec![0; len],
            token_type_ids: vec![0; len],
        };
        for (i, [ids, mask, types]) in rows.iter().enumerate() {
            let span = i * seq_len..(i + 1) * seq_len;
            widen_into(&mut packed.input_ids[span.clone()], ids);
            widen_into(&mut packed.attention_mask[span.clone()], mask);
            widen_into(&mut packed.token_type_ids[span], types);
        }
        packed
    }

    fn shape(&self) -> [i64; 2] {
        [self.rows as i64, self.seq_len as i64]
    }

    fn mask_row(&self, row: usize) -> &[i64] {
        &self.attention_mask[row * self.seq_len..][..self.seq_len]
    }
}

fn widen_into(dst: &mut [i64], src: &[u32]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = i64::from(s);
    }
}

impl Embed for OnnxEmbedder {
    fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(EMBED_BATCH_SIZE) {
            embeddings.extend(self.embed_chunk(chunk)?);
            debug!(done = embeddings.len(), total = texts.len(), "embedded chunk");
        }
        Ok(embeddings)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Mask-weighted mean over token vectors, then L2-normalized.
///
/// `tokens` is `[seq_len, dim]` flattened; `mask` may be longer than the
/// model's output sequence and is truncated to it.
fn mean_pool(tokens: &[f32], mask: &[i64], dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut token_count = 0.0f32;

    for (token, &m) in tokens.chunks_exact(dim).zip(mask) {
        if m > 0 {
            let w = m as f32;
            for (p, &x) in pooled.iter_mut().zip(token) {
                *p += x * w;
            }
            token_count += w;
        }
    }

    if token_count > 0.0 {
        for p in &mut pooled {
            *p /= token_count;
        }
    }
    normalize(&mut pooled);
    pooled
}

/// L2-normalize a vector in place.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn first_output<T>(outputs: &[T]) -> anyhow::Result<&T> {
    outputs
        .first()
        .ok_or_else(|| anyhow::anyhow!("embedding model declares no outputs"))
}

/// Try to infer the embedding dimension from the ONNX model output type.
fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn model_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("all-MiniLM-L6-v2")
    }

    #[test]
    fn mean_pool_ignores_padding() {
        // Two real tokens, one padded token that must not contribute.
        let tokens = [1.0, 0.0, 0.0, 1.0, 100.0, 100.0];
        let pooled = mean_pool(&tokens, &[1, 1, 0], 2);
        let diag = 1.0 / 2.0f32.sqrt();
        assert!((pooled[0] - diag).abs() < 1e-6);
        assert!((pooled[1] - diag).abs() < 1e-6);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let pooled = mean_pool(&[3.0, 4.0], &[0], 2);
        assert_eq!(pooled, vec![0.0, 0.0]);
    }

    #[test]
    fn normalize_to_unit_length() {
        let mut v = [3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn pack_pads_shorter_rows_with_zeros() {
        let long: [&[u32]; 3] = [&[101, 2, 3, 102], &[1, 1, 1, 1], &[0, 0, 0, 0]];
        let short: [&[u32]; 3] = [&[101, 102], &[1, 1], &[0, 0]];
        let inputs = PaddedInputs::pack(&[long, short]);

        assert_eq!(inputs.shape(), [2, 4]);
        assert_eq!(inputs.input_ids, vec![101, 2, 3, 102, 101, 102, 0, 0]);
        assert_eq!(inputs.mask_row(0), &[1, 1, 1, 1]);
        assert_eq!(inputs.mask_row(1), &[1, 1, 0, 0]);
        assert_eq!(inputs.token_type_ids, vec![0; 8]);
    }

    #[test]
    fn pack_empty_batch() {
        let inputs = PaddedInputs::pack(&[]);
        assert_eq!(inputs.shape(), [0, 0]);
        assert!(inputs.input_ids.is_empty());
    }

    #[test]
    fn model_without_outputs_is_an_error() {
        let none: [u8; 0] = [];
        let err = first_output(&none).unwrap_err();
        assert!(err.to_string().contains("no outputs"), "{err}");
        assert_eq!(first_output(&[7u8, 8]).unwrap(), &7);
    }

    #[test]
    fn missing_model_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = OnnxEmbedder::load(dir.path()).err().unwrap();
        assert!(matches!(err, ModelLoadError::EmbedderNotFound(p) if p.ends_with("model.onnx")));
    }

    #[test]
    #[ignore = "needs models/all-MiniLM-L6-v2/model.onnx"]
    fn embed_batch_is_normalized() {
        let embedder = OnnxEmbedder::load(&model_dir()).unwrap();
        assert_eq!(embedder.dim(), 384);

        let texts = [
            "Stocks rally as inflation cools",
            "Markets fall on recession fears",
            "City council approves new budget",
        ];
        let vecs = embedder.embed(&texts).unwrap();
        assert_eq!(vecs.len(), 3);
        for (i, v) in vecs.iter().enumerate() {
            assert_eq!(v.len(), 384, "text {i} has wrong dimension");
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4, "text {i}: expected unit norm, got {norm}");
        }
    }

    #[test]
    #[ignore = "needs models/all-MiniLM-L6-v2/model.onnx"]
    fn sub_batching_matches_single_run() {
        let embedder = OnnxEmbedder::load(&model_dir()).unwrap();
        let texts: Vec<String> = (0..EMBED_BATCH_SIZE + 5)
            .map(|i| format!("Headline number {i}"))
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let all = embedder.embed(&refs).unwrap();
        let last = embedder.embed(&refs[refs.len() - 1..]).unwrap();
        assert_eq!(all.len(), refs.len());
        let sim: f32 = all[refs.len() - 1].iter().zip(&last[0]).map(|(a, b)| a * b).sum();
        assert!(sim > 0.999, "same text should embed identically, got {sim}");
    }

    #[test]
    #[ignore = "needs models/all-MiniLM-L6-v2/model.onnx"]
    fn embed_empty_batch() {
        let embedder = OnnxEmbedder::load(&model_dir()).unwrap();
        assert!(embedder.embed(&[]).unwrap().is_empty());
    }
}
