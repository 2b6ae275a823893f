use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Answer when the capability is switched off entirely.
pub const DISABLED_MESSAGE: &str = "AI analysis is currently disabled.";

/// Answer when a live call fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Unable to generate analysis at this time.";

const SYSTEM_PROMPT: &str = "You are a financial analyst assistant. Provide concise, \
    data-driven insights based on the provided information. Format responses with clear \
    headings and bullet points when appropriate.";

/// Text-analysis capability. Total by construction: implementations answer
/// with prose or with a fixed fallback string, never an error, so nothing
/// upstream has to care whether the capability is live.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}

/// Default provider: answers without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl AnalysisProvider for Disabled {
    async fn generate(&self, _prompt: &str) -> String {
        DISABLED_MESSAGE.to_string()
    }
}

/// Configuration for an OpenAI-style chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl ChatClientConfig {
    /// Loads config from env vars:
    /// - `ANALYSIS_BASE_URL` (default: `https://api.openai.com/v1`)
    /// - `ANALYSIS_API_KEY`  (no default; absent means disabled)
    /// - `ANALYSIS_MODEL`    (default: `gpt-4`)
    pub fn from_env() -> Self {
        let base_url = std::env::var("ANALYSIS_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("ANALYSIS_API_KEY").ok();
        let model = std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        Self {
            base_url,
            api_key,
            model,
        }
    }
}

/// Minimal chat-completions client (async HTTP).
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self> {
        let base_url = validate_base_url(&config.base_url)?;
        let api_key = config
            .api_key
            .ok_or_else(|| anyhow!("ANALYSIS_API_KEY is not set"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            model: config.model,
        })
    }

    async fn chat(&self, user_prompt: &str) -> Result<String> {
        let endpoint = self
            .base_url
            .join("chat/completions")
            .context("Failed to build chat completions URL")?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let response: ChatResponse = self
            .http
            .post(endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?
            .error_for_status()
            .with_context(|| format!("POST {endpoint} returned non-success status"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {endpoint}"))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or_else(|| anyhow!("Chat response had no message content"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl AnalysisProvider for ChatClient {
    async fn generate(&self, prompt: &str) -> String {
        match self.chat(prompt).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "analysis call failed, using fallback");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// Builds the provider the environment asks for: a live client when an API
/// key is configured and its base URL is valid, the disabled one otherwise.
pub fn provider_from_env() -> Box<dyn AnalysisProvider> {
    let config = ChatClientConfig::from_env();
    if config.api_key.is_none() {
        return Box::new(Disabled);
    }
    match ChatClient::new(config) {
        Ok(client) => Box::new(client),
        Err(error) => {
            warn!(%error, "analysis client misconfigured, running disabled");
            Box::new(Disabled)
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<Url> {
    // A trailing slash matters to Url::join; normalize it on.
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    let url = Url::parse(&normalized)
        .with_context(|| format!("Invalid ANALYSIS_BASE_URL: {base_url}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow!(
                "Unsupported scheme '{other}' for ANALYSIS_BASE_URL (use http or https)"
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(anyhow!("ANALYSIS_BASE_URL is missing a host"));
    }

    Ok(url)
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}
