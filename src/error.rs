//! Error taxonomy for the extraction and conversation pipeline.
//!
//! Extraction failures are scoped to a single file and never abort an upload
//! batch. Model-service failures abort the in-progress question only; the
//! conversation is left unmodified. Export failures are fatal to that export
//! alone.

use thiserror::Error;

/// Per-file extraction failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {name}")]
    UnsupportedFormat { name: String },

    #[error("not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("{format} parse failed: {message}")]
    ParseFailed {
        format: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure talking to the generative-model service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by the model service")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed model response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Transient failures (timeout, transport, 429, 5xx) warrant a bounded
    /// retry; auth/quota rejections and malformed responses do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) | Self::RateLimited => true,
            Self::Api { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Failure writing the transcript PDF.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Missing or unusable client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}
