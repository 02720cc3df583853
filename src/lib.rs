//! Chat with your documents.
//!
//! Upload heterogeneous files (text, office formats, PDF, markup, images),
//! extract their text, hold a multi-turn Q&A conversation over that content
//! through the Gemini API with web search enabled, and export the transcript
//! as a paginated A4 PDF.
//!
//! ```text
//! Extractors -> Aggregator -> SessionState -> AnswerEngine -> Transcript PDF
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod llm;
pub mod session;

pub use config::GeminiConfig;
pub use engine::{build_content_blocks, AnswerEngine, AnswerModel, AskOutcome, ContentBlock};
pub use error::{ConfigError, ExportError, ExtractError, LlmError};
pub use export::{export_transcript, EXPORT_FILE_NAME};
pub use extract::{extract, ExtractedContent, FileFormat, ImagePayload, UploadedFile};
pub use llm::GeminiClient;
pub use session::{ConversationTurn, FileError, SessionState, UploadReport};
