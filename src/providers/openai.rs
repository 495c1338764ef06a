use super::{ChatCompletionRequest, ChatTransport};
use crate::core::error::PxError;
use crate::http::{HttpClient, HttpSettings, RequestOptions};
use async_trait::async_trait;

/// Posts chat completions to an OpenAI-compatible endpoint with bearer auth
#[derive(Debug, Clone)]
pub struct OpenAITransport {
    client: HttpClient,
    url: String,
    api_key: String,
}

impl OpenAITransport {
    pub fn new(url: String, api_key: String, settings: &HttpSettings) -> Result<Self, PxError> {
        if api_key.trim().is_empty() {
            return Err(PxError::Config(
                "OpenAI token cannot be empty, set OPENAI_API_KEY first".to_string(),
            ));
        }
        Ok(Self {
            client: HttpClient::new(settings)?,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatTransport for OpenAITransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<serde_json::Value, PxError> {
        let options = RequestOptions::json(request)?.bearer(&self.api_key);
        self.client.post(&self.url, options).await
    }
}
