//! Chat-completion API configuration loaded from environment variables.

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token for the API. Required.
    pub api_key: String,
    /// Base URL (default: `https://api.openai.com/v1`). Any
    /// OpenAI-compatible endpoint works.
    pub base_url: String,
    /// Model name (default: `gpt-4o-mini`).
    pub model: String,
    /// Sampling temperature (default: `0.2` -- answers should be stable).
    pub temperature: f32,
}

impl OpenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Required | Default                     |
    /// |----------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY`     | **yes**  | --                          |
    /// | `OPENAI_BASE_URL`    | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`       | no       | `gpt-4o-mini`               |
    /// | `OPENAI_TEMPERATURE` | no       | `0.2`                       |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is not set or is empty, so a misconfigured
    /// deployment fails at startup instead of on the first request.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "OPENAI_API_KEY must not be empty");

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

        let temperature: f32 = std::env::var("OPENAI_TEMPERATURE")
            .unwrap_or_else(|_| "0.2".into())
            .parse()
            .expect("OPENAI_TEMPERATURE must be a valid f32");

        Self {
            api_key,
            base_url,
            model,
            temperature,
        }
    }
}
