//! The reasoning node: one invocation, one thought.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::augment::Augmenter;
use crate::error::AgentError;
use crate::flow::{Action, Node, Outcome};
use crate::llm::LlmClient;
use crate::plan::{render_plan, search_queries};
use crate::repair::parse_validated_thought;
use crate::thought::Thought;

use super::context::{Context, Params};
use super::prompt::{history_text, reasoning_prompt};
use super::runner::AgentOptions;

/// Chain-of-thought reasoning over the shared context.
///
/// Each invocation seeds the problem if needed, resolves pending search
/// queries through the augmenter, prompts the model for the next thought,
/// repairs and validates the response, and appends it to the audit trail.
/// Terminal thoughts set the solution and end the flow; all others route by
/// the model's chosen action (or `Continue` when branching is off).
pub struct ReasonNode {
    llm: Arc<dyn LlmClient>,
    augmenter: Option<Arc<Augmenter>>,
    options: AgentOptions,
}

impl ReasonNode {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        augmenter: Option<Arc<Augmenter>>,
        options: AgentOptions,
    ) -> Self {
        ReasonNode {
            llm,
            augmenter,
            options,
        }
    }

    /// One prompt, up to `llm_attempts` completion attempts. Transport
    /// failures propagate immediately (the outer retry wrapper owns those);
    /// parse and validation failures burn an attempt and re-prompt.
    async fn next_thought(&self, prompt: &str) -> Result<Thought, AgentError> {
        let attempts = self.options.llm_attempts.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let raw = self.llm.complete(prompt).await?;
            match parse_validated_thought(&raw) {
                Ok(thought) => return Ok(thought),
                Err(err) => {
                    if attempt >= attempts {
                        return Err(err);
                    }
                    tracing::warn!(attempt, error = %err, "unusable completion, re-prompting");
                }
            }
        }
    }

    async fn gather_material(&self, ctx: &mut Context) -> String {
        let augmenter = match &self.augmenter {
            Some(augmenter) => augmenter,
            None => return String::new(),
        };
        let queries = match ctx.thoughts.last() {
            Some(last) => search_queries(&last.planning),
            None => Vec::new(),
        };
        if queries.is_empty() {
            return String::new();
        }
        augmenter
            .resolve(&mut ctx.search_results, &mut ctx.scraped_content, &queries)
            .await;
        augmenter.render(&ctx.search_results, &ctx.scraped_content, &queries)
    }
}

#[async_trait]
impl Node<Context, Params> for ReasonNode {
    async fn invoke(&self, ctx: &mut Context, params: &Params) -> Result<Outcome, AgentError> {
        if ctx.problem.is_empty() {
            if let Some(problem) = &params.problem {
                ctx.problem = problem.clone();
            }
        }
        ctx.current_thought_number += 1;
        let number = ctx.current_thought_number;

        let history = history_text(&ctx.thoughts, self.options.history_window);
        let material = self.gather_material(ctx).await;
        let prompt = reasoning_prompt(
            &ctx.problem,
            &history,
            number,
            self.options.branching,
            self.augmenter.is_some(),
            &material,
        );

        let mut thought = self.next_thought(&prompt).await?;
        thought.thought_number = number;

        if self.options.narrate {
            println!("\n🔍 Thought #{number} complete");
            println!("📋 Updated plan:");
            println!("{}", render_plan(&thought.planning));
        }
        tracing::info!(
            thought_number = number,
            terminal = thought.is_terminal(),
            "thought recorded"
        );

        if thought.is_terminal() {
            let answer = thought.final_answer.clone().unwrap_or_default();
            ctx.solution = Some(answer.clone());
            ctx.thoughts.push(thought);
            if self.options.narrate {
                println!("🎯 Plan complete.");
            }
            return Ok(Outcome::end(Value::String(answer)));
        }

        // End from a non-terminal thought would stall the run; coerce it,
        // like any action when branching is off.
        let action = if self.options.branching {
            match thought
                .next_action
                .as_deref()
                .and_then(|s| s.parse::<Action>().ok())
            {
                Some(Action::End) | None => Action::Continue,
                Some(action) => action,
            }
        } else {
            Action::Continue
        };
        ctx.thoughts.push(thought);
        Ok(Outcome::route(action))
    }
}
