//! Gemini transport for the analysis engine.
//!
//! Sends one `generateContent` request per analysis call: a single user-role
//! content with two parts, the instruction prompt and the inline PNG data.
//! All failures surface as [`AnalysisError::Transport`] with the provider's
//! message passed through.

use crate::application::analysis::AnalysisProvider;
use crate::domain::AnalysisError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_model(DEFAULT_MODEL)
    }

    pub fn with_model(model: &str) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|err| {
                AnalysisError::Transport(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
            model: model.to_string(),
        })
    }

    fn build_request(prompt: &str, image_base64: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: image_base64.to_string(),
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image_base64: &str,
    ) -> Result<String, AnalysisError> {
        let body = Self::build_request(prompt, image_base64);
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        log::debug!(
            "sending analysis request to {}",
            url.replace(api_key, "***")
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;

        if !status.is_success() {
            log::error!("Gemini API error: {status} - {text}");
            return Err(AnalysisError::Transport(format!("HTTP {status}: {text}")));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|err| {
            AnalysisError::Transport(format!("unexpected provider payload: {err}"))
        })?;

        extract_text(&parsed)
    }
}

/// Model text of the first candidate.
///
/// Long replies arrive split across parts; the text is their concatenation.
fn extract_text(response: &GenerateContentResponse) -> Result<String, AnalysisError> {
    let Some(candidate) = response.candidates.first() else {
        return Err(AnalysisError::Transport(
            "no candidates in provider response".into(),
        ));
    };
    if candidate.content.parts.is_empty() {
        return Err(AnalysisError::Transport(
            "no parts in provider candidate".into(),
        ));
    }

    Ok(candidate
        .content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect())
}
