use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::wire::Credential;

const CREDENTIAL_KEY: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    pub image_base: String,
    pub image_width: u32,
    pub image_height: u32,
    pub image_probe_timeout_secs: u64,
    /// Image slots to attempt; clamped to 1..=4.
    pub max_images: usize,
    pub request_timeout_secs: u64,
    pub secrets_path: String,
    pub bind: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-lite".into(),
            api_base: "https://generativelanguage.googleapis.com".into(),
            image_base: "https://image.pollinations.ai".into(),
            image_width: 400,
            image_height: 300,
            image_probe_timeout_secs: 3,
            max_images: 4,
            request_timeout_secs: 120,
            secrets_path: ".streamlit/secrets.toml".into(),
            bind: "127.0.0.1".into(),
            port: 8501,
        }
    }
}

impl Config {
    /// Defaults, overlaid by the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Explicit value first, then the secrets file. The environment is
    /// folded into `explicit` by the caller.
    pub fn resolve_credential(&self, explicit: Option<&str>) -> Result<Credential> {
        if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
            return Ok(Credential::new(key));
        }
        let path = Path::new(&self.secrets_path);
        if !path.is_file() {
            return Ok(Credential::default());
        }
        let raw = fs::read_to_string(path)?;
        let secrets: toml::Table = toml::from_str(&raw)
            .with_context(|| format!("invalid secrets file {}", path.display()))?;
        let key = secrets
            .get(CREDENTIAL_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Ok(Credential::new(key))
    }
}
