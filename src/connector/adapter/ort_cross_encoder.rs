use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;

use crate::application::{CrossEncoder, CrossEncoderLoader, RawScores};
use crate::domain::{DomainError, ModelConfig};

const DEFAULT_MAX_SEQ_LENGTH: usize = 512;
const BATCH_SIZE: usize = 32;

const TOKENIZER_FILE: &str = "tokenizer.json";
const FP32_MODEL_FILES: &[&str] = &["model.onnx", "onnx/model.onnx"];
const FP16_MODEL_FILES: &[&str] = &["model_fp16.onnx", "onnx/model_fp16.onnx"];

/// Hub repos that publish ONNX exports of reranker ids shipping only
/// PyTorch/safetensors weights.
const ONNX_EXPORTS: &[(&str, &str)] = &[
    ("BAAI/bge-reranker-v2-m3", "onnx-community/bge-reranker-v2-m3-ONNX"),
    ("BAAI/bge-reranker-base", "Xenova/bge-reranker-base"),
    ("BAAI/bge-reranker-large", "Xenova/bge-reranker-large"),
];

/// Hub repo to fetch ONNX files from for `model_name`.
pub fn onnx_source_repo(model_name: &str) -> &str {
    ONNX_EXPORTS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(model_name))
        .map_or(model_name, |&(_, export)| export)
}

/// Loads [`OrtCrossEncoder`]s from the Hugging Face hub or a local directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtCrossEncoderLoader;

impl CrossEncoderLoader for OrtCrossEncoderLoader {
    fn load(&self, config: &ModelConfig) -> Result<Arc<dyn CrossEncoder>, DomainError> {
        Ok(Arc::new(OrtCrossEncoder::new(config)?))
    }
}

/// Cross-encoder running an ONNX export through ONNX Runtime.
pub struct OrtCrossEncoder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    max_sequence_length: usize,
}

impl OrtCrossEncoder {
    /// `config.model_name` is treated as a local directory when one exists at
    /// that path, and as a Hugging Face model id otherwise.
    pub fn new(config: &ModelConfig) -> Result<Self, DomainError> {
        info!(
            "Initializing ORT cross-encoder with model: {} (fp16: {})",
            config.model_name, config.use_fp16
        );

        let local_dir = Path::new(&config.model_name);

        let (model_path, tokenizer_path) = if local_dir.is_dir() {
            debug!("Resolving model files in local directory {:?}", local_dir);
            resolve_model_files(config.use_fp16, |file| {
                let path = local_dir.join(file);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(format!("{} not found", path.display()))
                }
            })?
        } else {
            let api = hf_hub::api::sync::ApiBuilder::new()
                .with_progress(true)
                .build()
                .map_err(|e| DomainError::model_load(format!("Failed to create HF API: {}", e)))?;

            let source = onnx_source_repo(&config.model_name);
            if source != config.model_name {
                info!(
                    "Fetching ONNX export of {} from {}",
                    config.model_name, source
                );
            }
            let repo = api.model(source.to_string());

            resolve_model_files(config.use_fp16, |file| {
                repo.get(file).map_err(|e| e.to_string())
            })
            .map_err(|e| describe_missing_export(e, source))?
        };

        Self::from_paths(model_path, tokenizer_path, &config.model_name)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
    ) -> Result<Self, DomainError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Self::create_session(&model_path)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::model_load(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name: model_name.to_string(),
            max_sequence_length: DEFAULT_MAX_SEQ_LENGTH,
        })
    }

    fn create_session(model_path: &Path) -> Result<Session, DomainError> {
        let builder = Session::builder().map_err(|e| {
            DomainError::model_load(format!("Failed to create session builder: {}", e))
        })?;

        #[cfg(feature = "cuda")]
        let builder = {
            if CUDAExecutionProvider::is_available() {
                info!("CUDA execution provider available, enabling GPU acceleration");
            } else {
                warn!("CUDA execution provider not available (missing CUDA/cuDNN?), falling back to CPU");
            }
            builder
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(|e| {
                    DomainError::model_load(format!("Failed to set CUDA execution provider: {}", e))
                })?
        };

        #[cfg(feature = "coreml")]
        let builder = {
            if CoreMLExecutionProvider::is_available() {
                info!("CoreML execution provider available, enabling GPU/ANE acceleration");
            } else {
                warn!("CoreML execution provider not available, falling back to CPU");
            }
            builder
                .with_execution_providers([CoreMLExecutionProvider::default()
                    .with_subgraphs()
                    .build()])
                .map_err(|e| {
                    DomainError::model_load(format!(
                        "Failed to set CoreML execution provider: {}",
                        e
                    ))
                })?
        };

        #[cfg(not(any(feature = "cuda", feature = "coreml")))]
        info!("No GPU execution provider configured, using CPU");

        builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                DomainError::model_load(format!("Failed to set optimization level: {}", e))
            })?
            .commit_from_file(model_path)
            .map_err(|e| DomainError::model_load(format!("Failed to load ONNX model: {}", e)))
    }

    fn score_batch(&self, pairs: &[(&str, &str)], normalize: bool) -> Result<Vec<f32>, DomainError> {
        if pairs.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = pairs.len();

        let encodings = self
            .tokenizer
            .encode_batch(pairs.to_vec(), true)
            .map_err(|e| DomainError::scoring(format!("Tokenization failed: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_sequence_length);

        let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            let len = ids.len().min(max_len);

            input_ids.extend(ids[..len].iter().map(|&x| x as i64));
            attention_mask.extend(mask[..len].iter().map(|&x| x as i64));

            let padding = max_len - len;
            input_ids.extend(std::iter::repeat_n(0i64, padding));
            attention_mask.extend(std::iter::repeat_n(0i64, padding));
        }

        let shape = [batch_size, max_len];
        let input_ids_tensor = Tensor::from_array((shape, input_ids)).map_err(|e| {
            DomainError::scoring(format!("Failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask)).map_err(|e| {
            DomainError::scoring(format!("Failed to create attention_mask tensor: {}", e))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::scoring(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| DomainError::scoring(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| DomainError::scoring("No output tensor found"))?;

        let (shape, data) = output_value.try_extract_tensor::<f32>().map_err(|e| {
            DomainError::scoring(format!("Failed to extract output tensor: {}", e))
        })?;

        let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", shape);

        // One logit per pair, either as [batch, 1] or already squeezed to [batch].
        let logits: Vec<f32> = match shape.as_slice() {
            [_, 1] | [_] => data.iter().take(batch_size).copied().collect(),
            _ => {
                return Err(DomainError::scoring(format!(
                    "Unexpected output tensor shape: {:?}",
                    shape
                )))
            }
        };

        if normalize {
            Ok(logits.into_iter().map(sigmoid).collect())
        } else {
            Ok(logits)
        }
    }
}

impl CrossEncoder for OrtCrossEncoder {
    fn compute_scores(
        &self,
        pairs: &[(&str, &str)],
        normalize: bool,
    ) -> Result<RawScores, DomainError> {
        let mut all_scores: Vec<f64> = Vec::with_capacity(pairs.len());

        for batch in pairs.chunks(BATCH_SIZE) {
            let scores = self.score_batch(batch, normalize)?;
            all_scores.extend(scores.into_iter().map(f64::from));
        }

        Ok(RawScores::from(all_scores))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn describe_missing_export(err: DomainError, source: &str) -> DomainError {
    match err {
        DomainError::ModelLoad(msg) => DomainError::model_load(format!(
            "{} (hub repo {} must contain tokenizer.json and model.onnx or onnx/model.onnx; \
             pass an ONNX export repo or a local directory as --model-name)",
            msg, source
        )),
        other => other,
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Finds the tokenizer and the ONNX graph through `fetch`, preferring the fp16
/// export when asked and falling back to full precision when there is none.
fn resolve_model_files<F>(use_fp16: bool, mut fetch: F) -> Result<(PathBuf, PathBuf), DomainError>
where
    F: FnMut(&str) -> Result<PathBuf, String>,
{
    let tokenizer_path = fetch(TOKENIZER_FILE)
        .map_err(|e| DomainError::model_load(format!("Failed to fetch tokenizer: {}", e)))?;

    let candidates: Vec<&str> = if use_fp16 {
        FP16_MODEL_FILES
            .iter()
            .chain(FP32_MODEL_FILES)
            .copied()
            .collect()
    } else {
        FP32_MODEL_FILES.to_vec()
    };

    let mut last_error = String::from("no candidate files");
    for file in candidates {
        match fetch(file) {
            Ok(path) => {
                if use_fp16 && !FP16_MODEL_FILES.contains(&file) {
                    warn!("No fp16 ONNX export found, using full precision {}", file);
                }
                return Ok((path, tokenizer_path));
            }
            Err(e) => {
                debug!("Model file {} unavailable: {}", file, e);
                last_error = e;
            }
        }
    }

    Err(DomainError::model_load(format!(
        "Failed to fetch ONNX model: {}",
        last_error
    )))
}
