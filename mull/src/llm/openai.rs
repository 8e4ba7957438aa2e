//! OpenAI-compatible chat completion client over plain HTTP.

use serde_json::json;

use async_trait::async_trait;

use crate::error::AgentError;

use super::LlmClient;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Chat-completions client for any OpenAI-compatible endpoint.
///
/// Sends the prompt as a single user message and returns
/// `choices[0].message.content` verbatim. Non-success statuses and missing
/// content map to [`AgentError::Transport`].
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(api_key: String) -> Self {
        OpenAiChat {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Points the client at a non-default endpoint, e.g. a local server.
    /// A trailing slash on `base_url` is tolerated.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let err_body = res.text().await.unwrap_or_default();
            return Err(AgentError::Transport(format!(
                "completion API error {}: {}",
                status, err_body
            )));
        }
        let out: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        out["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                AgentError::Transport("completion response missing message content".to_string())
            })
    }
}
