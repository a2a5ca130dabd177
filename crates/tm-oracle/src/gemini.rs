//! Google Gemini `generateContent` client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};
use crate::service::{Purpose, TextService};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const MAX_ERROR_BODY: usize = 300;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        Some(text)
    }
}

/// Blocking Gemini client routing each [`Purpose`] to its configured model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    narrative_model: String,
    command_model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        narrative_model: impl Into<String>,
        command_model: impl Into<String>,
        timeout: Duration,
    ) -> GenerationResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            narrative_model: narrative_model.into(),
            command_model: command_model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Point the client at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model used for a purpose.
    pub fn model_for(&self, purpose: Purpose) -> &str {
        match purpose {
            Purpose::Narrative => &self.narrative_model,
            Purpose::Command => &self.command_model,
        }
    }

    fn map_transport(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            GenerationError::Transport(e.to_string())
        }
    }

    fn endpoint(&self, purpose: Purpose) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_for(purpose)
        )
    }
}

impl TextService for GeminiClient {
    fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = self.model_for(purpose),
            prompt_len = prompt.len(),
            "calling text service"
        );

        let response = self
            .http
            .post(self.endpoint(purpose))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|e| self.map_transport(e))?;
        let text = parse_response(&body)?;
        tracing::debug!(len = text.len(), "text service responded");
        Ok(text)
    }
}

fn parse_response(body: &str) -> GenerationResult<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    parsed.text().ok_or(GenerationError::Empty)
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
