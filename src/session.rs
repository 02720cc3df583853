//! In-memory session state and upload-batch aggregation.
//!
//! A session owns the conversation, the aggregated document context, and the
//! single retained image. It lives for one interactive session only; nothing
//! is persisted.

use crate::error::ExtractError;
use crate::extract::{self, ExtractedContent, ImagePayload, UploadedFile};

/// One question-answer pair. Immutable once appended; conversation order is
/// chronological, display, and export order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// A per-file failure from an upload batch.
#[derive(Debug)]
pub struct FileError {
    pub file_name: String,
    pub error: ExtractError,
}

/// Outcome of processing one upload batch. Errors are per file and never
/// cancel the rest of the batch.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub files_processed: usize,
    pub errors: Vec<FileError>,
}

/// All state owned by a single interactive session.
#[derive(Debug)]
pub struct SessionState {
    pub conversation: Vec<ConversationTurn>,
    pub documents_text: String,
    pub chat_active: bool,
    pub last_image: Option<ImagePayload>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            conversation: Vec::new(),
            documents_text: String::new(),
            chat_active: true,
            last_image: None,
        }
    }

    /// Process an upload batch: extract every file in the order presented,
    /// then replace the session's aggregated context wholesale.
    ///
    /// Later batches do not merge with earlier ones. The retained image is the
    /// batch's last image; a batch with no image clears it.
    pub fn upload(&mut self, files: &[UploadedFile]) -> UploadReport {
        let mut text = String::new();
        let mut image: Option<ImagePayload> = None;
        let mut report = UploadReport::default();

        for file in files {
            match extract::extract(file) {
                Ok(ExtractedContent::Text(extracted)) => {
                    text.push_str(&extracted);
                    text.push('\n');
                    report.files_processed += 1;
                }
                Ok(ExtractedContent::Image(payload)) => {
                    image = Some(payload);
                    text.push_str("Image uploaded and processed.\n");
                    report.files_processed += 1;
                }
                Err(error) => {
                    tracing::warn!(file = %file.name, %error, "extraction failed");
                    report.errors.push(FileError {
                        file_name: file.name.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            files = report.files_processed,
            failed = report.errors.len(),
            chars = text.len(),
            "upload batch aggregated"
        );

        self.documents_text = text;
        self.last_image = image;
        report
    }

    pub fn push_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.conversation.push(ConversationTurn {
            question: question.into(),
            answer: answer.into(),
        });
    }

    pub fn end_chat(&mut self) {
        self.chat_active = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
