//! Answer engine.
//!
//! Builds the ordered model request from session state, invokes the model,
//! and records the resulting turn. The block order is a contract: the model
//! must see prior turns before the document context before the new question,
//! so grounding and history stay distinguishable.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::LlmError;
use crate::extract::ImagePayload;
use crate::session::SessionState;

/// Session-termination sentinel, matched case- and whitespace-insensitively.
const EXIT_SENTINEL: &str = "exit";

/// One ordered block of the model request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    InlineImage(ImagePayload),
}

/// Seam to the external generative-model service.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn generate(&self, blocks: &[ContentBlock]) -> Result<String, LlmError>;
}

/// Result of submitting one question.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// The model answered and the turn was recorded.
    Answered(String),
    /// The exit sentinel was received; the session is now inactive.
    ChatEnded,
    /// The session is inactive; the question was not accepted.
    Rejected,
}

pub struct AnswerEngine {
    model: Arc<dyn AnswerModel>,
}

impl AnswerEngine {
    pub fn new(model: Arc<dyn AnswerModel>) -> Self {
        Self { model }
    }

    /// Submit one question against the session.
    ///
    /// The exit sentinel ends the chat without a model call and without a new
    /// turn. A model failure propagates with no partial turn recorded.
    pub async fn ask(
        &self,
        session: &mut SessionState,
        question: &str,
    ) -> Result<AskOutcome, LlmError> {
        if !session.chat_active {
            tracing::debug!("question rejected: chat is no longer active");
            return Ok(AskOutcome::Rejected);
        }

        if is_exit_sentinel(question) {
            session.end_chat();
            tracing::info!("chat ended by exit sentinel");
            return Ok(AskOutcome::ChatEnded);
        }

        let blocks = build_content_blocks(session, question);
        let answer = self.model.generate(&blocks).await?;
        session.push_turn(question, answer.clone());
        Ok(AskOutcome::Answered(answer))
    }
}

/// True when the input matches the session-termination sentinel.
pub fn is_exit_sentinel(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_SENTINEL)
}

/// Assemble the request payload in its contractual order: prior turns, then
/// document context, then the retained image, then the new question. Blocks
/// that would be empty are omitted.
pub fn build_content_blocks(session: &SessionState, question: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    if !session.conversation.is_empty() {
        let history = session
            .conversation
            .iter()
            .map(|turn| format!("Q: {}\nA: {}", turn.question, turn.answer))
            .collect::<Vec<_>>()
            .join("\n\n");
        blocks.push(ContentBlock::Text(format!(
            "Previous conversation:\n{history}"
        )));
    }

    if !session.documents_text.trim().is_empty() {
        blocks.push(ContentBlock::Text(format!(
            "Context:\n{}",
            session.documents_text
        )));
    }

    if let Some(image) = &session.last_image {
        blocks.push(ContentBlock::InlineImage(image.clone()));
    }

    blocks.push(ContentBlock::Text(format!("Question: {question}")));
    blocks
}
