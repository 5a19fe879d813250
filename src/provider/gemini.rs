use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{ModelInfo, Provider};
use crate::errors::PlannerError;
use crate::wire::Credential;

const GENERATE_METHOD: &str = "generateContent";

/// Gemini REST provider. The prompt goes out as a single user turn.
pub struct GeminiProvider {
    api_base: String,
    model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_base: String, model: String, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { api_base, model, client })
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/v1beta/{}", self.api_base.trim_end_matches('/'), tail)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<RemoteModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Map a non-success HTTP reply onto the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> PlannerError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let key_rejected = status == StatusCode::BAD_REQUEST && message.contains("API key");
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_rejected {
        PlannerError::Auth(message)
    } else {
        PlannerError::Api { status: status.as_u16(), message }
    }
}

/// Text of the first candidate, parts concatenated.
fn candidate_text(resp: GenerateResponse) -> Result<String, PlannerError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(PlannerError::Api { status: 200, message: format!("prompt blocked: {reason}") });
    }
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(PlannerError::Api { status: 200, message: "response contained no text".into() });
    }
    Ok(text)
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<String, PlannerError> {
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ]
        });
        let url = self.url(&format!("models/{}:{}", self.model, GENERATE_METHOD));
        tracing::debug!(model = %self.model, "POST {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", credential.expose())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%status, bytes = text.len(), "gemini replied");

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| PlannerError::Api { status: status.as_u16(), message: format!("unreadable response: {e}") })?;
        candidate_text(parsed)
    }

    async fn list_models(&self, credential: &Credential) -> Result<Vec<ModelInfo>, PlannerError> {
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .client
                .get(self.url("models"))
                .header("x-goog-api-key", credential.expose());
            if let Some(tok) = &page_token {
                req = req.query(&[("pageToken", tok)]);
            }
            let resp = req.send().await?;
            let status = resp.status();
            let text = resp.text().await?;
            if !status.is_success() {
                return Err(classify_failure(status, &text));
            }
            let page: ModelList = serde_json::from_str(&text)?;
            out.extend(
                page.models
                    .into_iter()
                    .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
                    .map(|m| ModelInfo { name: m.name, display_name: m.display_name }),
            );
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(t) => page_token = Some(t),
                None => break,
            }
        }
        Ok(out)
    }
}
