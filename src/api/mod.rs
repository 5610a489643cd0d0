//! Gemini `generateContent` wire payloads and HTTP client.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentRequest {
    /// The request carries only the latest user text, not the conversation
    /// history.
    pub fn from_user_text(text: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
        }
    }
}

/// The single user-visible failure kind: transport failure, non-success HTTP
/// status, and malformed payload all surface as the error text shown in place
/// of the response.
#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    Api { message: String },
    MalformedResponse { detail: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(source) => write!(f, "{source}"),
            ApiError::Api { message } => write!(f, "{message}"),
            ApiError::MalformedResponse { detail } => {
                write!(f, "Unexpected API response: {detail}")
            }
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Transport(source) => Some(source),
            _ => None,
        }
    }
}

/// Extract the generated text from a response body, or the error message from
/// an error body. Kept separate from the HTTP call so payload handling is
/// testable without a server.
pub fn parse_response_body(status_ok: bool, body: &str) -> Result<String, ApiError> {
    if !status_ok {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| "API request failed".to_string());
        return Err(ApiError::Api { message });
    }

    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
            detail: e.to_string(),
        })?;

    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.clone())
        .ok_or_else(|| ApiError::MalformedResponse {
            detail: "response contained no candidate text".to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    /// One POST per submitted message. Any transport failure, error status, or
    /// unexpected payload maps to [`ApiError`].
    pub async fn generate_content(&self, user_text: &str) -> Result<String, ApiError> {
        let request = GenerateContentRequest::from_user_text(user_text);
        tracing::debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status_ok = response.status().is_success();
        let body = response.text().await.map_err(ApiError::Transport)?;
        parse_response_body(status_ok, &body)
    }
}
