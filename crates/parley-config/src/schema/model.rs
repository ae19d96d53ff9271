use serde::{Deserialize, Serialize};

/// Generative model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier, e.g. `gemini-pro`.
    pub name: String,
    /// Base URL including the API version segment.
    pub api_base: String,
    /// Maximum output tokens per answer (valid range: 1-65536).
    pub max_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Instruction sent ahead of every turn.
    pub system_prompt: Option<String>,
    /// Use the streaming endpoint.
    pub stream: bool,
    /// Bound on a single provider call in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-pro".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            max_tokens: 2048,
            temperature: 0.9,
            system_prompt: None,
            stream: true,
            request_timeout_secs: 60,
            api_key_env: "GENAI_API_KEY".into(),
        }
    }
}
