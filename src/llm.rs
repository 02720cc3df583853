//! Gemini API client.
//!
//! One synchronous round trip per accepted question via `generateContent`,
//! with the `google_search` tool enabled so answers can draw on live web
//! results. Retryable failures (timeout, transport, 429, 5xx) get bounded
//! doubling backoff; terminal failures surface at once.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::engine::{AnswerModel, ContentBlock};
use crate::error::LlmError;

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn send_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let mut retry_delay = Duration::from_secs(2);
        let mut last_error = LlmError::Transport("no request attempted".to_string());

        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tracing::warn!(
                    retry,
                    max = self.config.max_retries,
                    error = %last_error,
                    "retrying model call"
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let resp = self
                .client
                .post(&url)
                .query(&[("key", self.config.api_key.as_str())])
                .json(request)
                .send()
                .await;

            let error = match resp {
                Ok(r) if r.status().is_success() => {
                    return r
                        .json()
                        .await
                        .map_err(|e| LlmError::InvalidResponse(e.to_string()));
                }
                Ok(r) if r.status().as_u16() == 429 => LlmError::RateLimited,
                Ok(r) => {
                    let status = r.status().as_u16();
                    let message = r.text().await.unwrap_or_default();
                    LlmError::Api { status, message }
                }
                Err(e) if e.is_timeout() => LlmError::Timeout,
                Err(e) => LlmError::Transport(e.to_string()),
            };

            if !error.is_retryable() {
                return Err(error);
            }
            last_error = error;
        }

        Err(last_error)
    }
}

#[async_trait::async_trait]
impl AnswerModel for GeminiClient {
    async fn generate(&self, blocks: &[ContentBlock]) -> Result<String, LlmError> {
        let request = GenerateContentRequest::from_blocks(blocks);
        tracing::debug!(
            model = %self.config.model,
            parts = request.contents[0].parts.len(),
            "sending generateContent request"
        );
        let response = self.send_request(&request).await?;
        response.answer_text()
    }
}

// Wire types. The REST API accepts proto-JSON field names in snake_case.

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Value,
}

impl GenerateContentRequest {
    fn from_blocks(blocks: &[ContentBlock]) -> Self {
        let parts = blocks
            .iter()
            .map(|block| match block {
                ContentBlock::Text(text) => Part::Text { text: text.clone() },
                ContentBlock::InlineImage(image) => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![RequestContent { parts }],
            tools: vec![Tool {
                google_search: serde_json::json!({}),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn answer_text(&self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("no candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            Err(LlmError::InvalidResponse(
                "response carried no text parts".to_string(),
            ))
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ImagePayload;

    #[test]
    fn test_request_serialization_preserves_block_order() {
        let blocks = vec![
            ContentBlock::Text("Context:\nhello".to_string()),
            ContentBlock::InlineImage(ImagePayload {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            }),
            ContentBlock::Text("Question: what?".to_string()),
        ];

        let request = GenerateContentRequest::from_blocks(&blocks);
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Context:\nhello");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "QUJD");
        assert_eq!(parts[2]["text"], "Question: what?");
        assert_eq!(value["tools"][0]["google_search"], serde_json::json!({}));
    }

    #[test]
    fn test_answer_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"The answer "},{"text":"is 100."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.answer_text().unwrap(), "The answer is 100.");
    }

    #[test]
    fn test_answer_text_rejects_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.answer_text(),
            Err(LlmError::InvalidResponse(_))
        ));

        let no_text: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(matches!(
            no_text.answer_text(),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
