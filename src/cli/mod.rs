use clap::{Parser, ValueEnum};

use crate::domain::{ModelConfig, DEFAULT_MODEL_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bge-reranker-server")]
#[command(author, version, about = "BGE Reranker v2-m3 API Server", long_about = None)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Number of async worker threads
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    /// BGE model name on the Hugging Face hub, or a local model directory
    #[arg(long, env = "BGE_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Prefer the fp16 ONNX export for faster inference
    #[arg(
        long,
        env = "BGE_USE_FP16",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub use_fp16: bool,

    /// Disable fp16 (overrides --use-fp16)
    #[arg(long)]
    pub no_fp16: bool,

    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Score with a deterministic mock model instead of downloading one
    #[arg(long)]
    pub mock_model: bool,
}

impl Cli {
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(&self.model_name, self.use_fp16 && !self.no_fp16)
    }

    pub fn worker_threads(&self) -> usize {
        self.workers.max(1)
    }
}
