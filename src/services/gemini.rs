use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::ImagePayload;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
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

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ReplyPart>>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateContentRequest {
    /// Content list is `[instruction]` without an image, `[instruction, image]`
    /// with one, in that order.
    fn build(instruction: &str, image: Option<&ImagePayload>) -> Self {
        let mut parts = vec![Part::Text {
            text: instruction.to_string(),
        }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.to_string(),
                    data: image.to_base64(),
                },
            });
        }
        Self {
            contents: vec![Content { parts }],
        }
    }
}

/// Anything that turns an instruction (plus an optional image) into text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, AnalysisError>;
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    retry_transient: bool,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(AnalysisError::Transport)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_transient: config.retry_transient,
            client,
        })
    }

    async fn call_once(&self, request: &GenerateContentRequest) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(AnalysisError::Transport)?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.map_err(AnalysisError::Transport)?;
            log::error!("❌ Gemini rejected the credential: {}", body);
            return Err(AnalysisError::Auth { status, body });
        }

        if !status.is_success() {
            let body = response.text().await.map_err(AnalysisError::Transport)?;
            log::error!("❌ Gemini API error response: {}", body);
            return Err(AnalysisError::Api { status, body });
        }

        let reply: GenerateContentResponse =
            response.json().await.map_err(AnalysisError::Transport)?;
        extract_text(reply)
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        instruction: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, AnalysisError> {
        let request = GenerateContentRequest::build(instruction, image);

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);
        if let Ok(payload) = serde_json::to_string(&request) {
            log::debug!("📤 Request payload size: {} bytes", payload.len());
        }

        match self.call_once(&request).await {
            Err(AnalysisError::Transport(err)) if self.retry_transient => {
                log::warn!(
                    "⚠️ Transport failure, retrying once after {:?}: {}",
                    RETRY_BACKOFF,
                    err
                );
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.call_once(&request).await
            }
            result => result,
        }
    }
}

fn extract_text(reply: GenerateContentResponse) -> Result<String, AnalysisError> {
    let text: String = reply
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AnalysisError::UnexpectedReply(
            "no text candidate in model reply".to_string(),
        ));
    }
    Ok(text)
}
