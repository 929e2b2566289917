//! Client configuration.

use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for the slower AI-backed endpoints (extract, summarize, quiz).
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the notebook API.
    pub base_url: String,
    /// Timeout for ordinary requests.
    pub timeout: Duration,
    /// Timeout for AI-backed requests (OCR, summarization, quiz
    /// generation), which routinely take longer.
    pub ai_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `NOTELACE_API_URL` | `http://localhost:8000` | API base URL |
    /// | `NOTELACE_TIMEOUT_SECS` | `30` | Ordinary request timeout |
    /// | `NOTELACE_AI_TIMEOUT_SECS` | `120` | AI endpoint timeout |
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("NOTELACE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("NOTELACE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let ai_timeout = std::env::var("NOTELACE_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
            ai_timeout: Duration::from_secs(ai_timeout),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the ordinary request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the AI endpoint timeout.
    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.ai_timeout = timeout;
        self
    }
}
