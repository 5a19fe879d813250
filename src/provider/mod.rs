use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::PlannerError;
use crate::wire::Credential;

pub mod gemini;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
}

/// A hosted generative-language service: prompt in, raw text out.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<String, PlannerError>;

    /// Models that accept content generation requests.
    async fn list_models(&self, credential: &Credential) -> Result<Vec<ModelInfo>, PlannerError>;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(cfg: &Config, model_override: Option<String>) -> anyhow::Result<DynProvider> {
    let model = model_override.unwrap_or_else(|| cfg.model.clone());
    Ok(Arc::new(gemini::GeminiProvider::new(
        cfg.api_base.clone(),
        model,
        cfg.request_timeout_secs,
    )?))
}
