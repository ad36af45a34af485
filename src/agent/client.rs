//! LLM client abstraction and its OpenRouter-backed implementation

use std::time::Duration;

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::agent::types::{ChatCompletionRequest, ChatCompletionResponse, GenerationOptions, Message};
use crate::config::types::provider::OpenRouterConfig;
use crate::error::{Error, Result};

/// Abstraction over a chat-completion backend
///
/// Tool calls are never native function-calling: `TaskExecution` parses
/// exactly one tool invocation out of the raw text this returns.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: Vec<Message>, options: GenerationOptions) -> Result<String>;
}

/// `LlmClient` backed by an OpenAI-compatible OpenRouter endpoint
pub struct OpenRouterLlmClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterLlmClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| Error::Config(format!("invalid API key format: {e}")))?,
        );
        if let Some(ref site_url) = config.site_url {
            if let Ok(value) = header::HeaderValue::from_str(site_url) {
                headers.insert("HTTP-Referer", value);
            }
        }
        if let Some(ref site_name) = config.site_name {
            if let Ok(value) = header::HeaderValue::from_str(site_name) {
                headers.insert("X-Title", value);
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(OpenRouterLlmClient { client, config })
    }

    async fn send_request(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %request.model, "sending completion request");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<ChatCompletionResponse>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status.as_u16() {
                401 => Err(Error::Unauthorized("invalid OpenRouter API key".to_string())),
                429 => {
                    warn!("OpenRouter rate limit exceeded");
                    Err(Error::RateLimit(body))
                }
                _ => Err(Error::Provider(format!("OpenRouter returned {status}: {body}"))),
            }
        }
    }

    async fn send_with_retry(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let backoff = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();

        let attempt = std::sync::atomic::AtomicU32::new(0);
        backoff::future::retry(backoff, || async {
            let attempt = attempt.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            match self.send_request(&request).await {
                Ok(resp) => Ok(resp),
                Err(e) if e.is_retryable() && attempt <= self.config.max_retries => {
                    Err(backoff::Error::transient(e))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        })
        .await
    }
}

#[async_trait]
impl LlmClient for OpenRouterLlmClient {
    async fn complete(&self, messages: Vec<Message>, options: GenerationOptions) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.default_model.clone(),
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            stop: options.stop,
        };

        let response = self.send_with_retry(request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }
}

/// Deterministic `LlmClient` for tests: replays a scripted sequence of responses
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
}

impl MockLlmClient {
    pub fn new(responses: Vec<impl Into<String>>) -> Self {
        MockLlmClient {
            responses: std::sync::Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _messages: Vec<Message>, _options: GenerationOptions) -> Result<String> {
        let mut queue = self.responses.lock().unwrap();
        queue.pop_front().ok_or_else(|| Error::Internal("MockLlmClient exhausted its scripted responses".to_string()))
    }
}
