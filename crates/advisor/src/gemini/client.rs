//! Gemini API client for single-turn text generation.
//!
//! Wraps the `generateContent` endpoint of the Google Generative Language API.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini API configuration containing API key and model
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value, the
    /// endpoint cannot be built, or the HTTP client fails to initialise.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: config.endpoint()?,
                model: config.model.clone(),
                generation: GenerationConfig {
                    temperature: config.temperature,
                    max_output_tokens: config.max_output_tokens,
                },
            }),
        })
    }

    /// Model this client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a single-turn request and get the complete response.
    ///
    /// # Arguments
    ///
    /// * `system` - System instruction
    /// * `prompt` - User prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, system, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn generate_content(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: Some(Content::instruction(system)),
            generation_config: Some(self.inner.generation),
        };

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Send a single-turn request and return only the generated text.
    ///
    /// # Errors
    ///
    /// In addition to [`GeminiClient::generate_content`] errors, returns
    /// [`GeminiError::Blocked`] when the prompt was blocked and
    /// [`GeminiError::EmptyResponse`] when no text came back.
    pub async fn generate_text(&self, system: &str, prompt: &str) -> Result<String, GeminiError> {
        let response = self.generate_content(system, prompt).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                reply_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        if let Some(text) = response.text() {
            return Ok(text);
        }
        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }
        Err(GeminiError::EmptyResponse(
            response
                .finish_reason()
                .map_or_else(|| "none".to_string(), |r| r.to_string()),
        ))
    }

    /// Handle a response, decoding success bodies and mapping failures.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized(format!("API key rejected ({status})"));
        }

        match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| GeminiError::Api {
                    status: status.to_string(),
                    message: body,
                },
                |api_error| GeminiError::Api {
                    status: api_error.error.status,
                    message: api_error.error.message,
                },
            ),
            Err(e) => GeminiError::Http(e),
        }
    }
}
