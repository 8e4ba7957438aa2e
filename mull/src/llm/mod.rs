//! Completion service boundary.
//!
//! The agent talks to exactly one method: prompt in, raw text out. Everything
//! downstream (repair, validation, routing) treats the completion as opaque
//! text, so any backend that can fill in a string fits behind this trait.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::OpenAiChat;

use async_trait::async_trait;

use crate::error::AgentError;

/// Single-turn completion service.
///
/// **Interaction**: held as `Arc<dyn LlmClient>` by the reasoning and
/// critique nodes; `OpenAiChat` is the production implementation and
/// `MockLlm` the scripted test double.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Completes one prompt. Failures map to [`AgentError::Transport`].
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
}
