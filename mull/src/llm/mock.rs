//! Mock LLM for tests and examples.
//!
//! Scripted FIFO responses with an optional fallback, recorded prompts for
//! assertions, and an optional leading run of transport failures to exercise
//! the retry path.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;

use super::LlmClient;

/// Scripted completion service.
///
/// Each `complete` call pops the next scripted response; when the script is
/// exhausted the fallback is returned, and with no fallback the call fails.
/// Prompts are recorded in call order for assertions.
///
/// **Interaction**: Implements `LlmClient`; used by the reasoning and
/// critique nodes in tests.
pub struct MockLlm {
    responses: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
    /// Remaining calls that fail with a transport error before any scripted
    /// response is served.
    failures_first: Mutex<u32>,
}

impl MockLlm {
    /// Creates a mock that serves `responses` in order.
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockLlm {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
            failures_first: Mutex::new(0),
        }
    }

    /// Creates a mock that always returns `response`.
    pub fn always(response: impl Into<String>) -> Self {
        MockLlm {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(response.into()),
            prompts: Mutex::new(Vec::new()),
            failures_first: Mutex::new(0),
        }
    }

    /// Response served after the script runs out (builder).
    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = Some(response.into());
        self
    }

    /// Fails the first `count` calls with a transport error (builder).
    pub fn failing_first(self, count: u32) -> Self {
        *self.failures_first.lock().unwrap() = count;
        self
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// A syntactically valid terminal thought carrying `answer`. Handy as a
    /// script entry when a test only cares that the run completes.
    pub fn terminal_thought(answer: &str) -> String {
        serde_json::json!({
            "current_thinking": format!("concluding with: {answer}"),
            "planning": [
                { "description": "answer the question", "status": "Done", "result": answer }
            ],
            "next_thought_needed": false,
            "final_answer": answer,
        })
        .to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        {
            let mut failures = self.failures_first.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AgentError::Transport("scripted failure".to_string()));
            }
        }
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            return Ok(next);
        }
        self.fallback.clone().ok_or_else(|| {
            AgentError::Transport("mock script exhausted and no fallback set".to_string())
        })
    }
}
