//! Self-critique: score the latest plan, route to revision when it is weak.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::flow::{Action, Node, Outcome};
use crate::llm::LlmClient;
use crate::plan::render_plan;
use crate::repair;

use super::context::{Context, Params};
use super::prompt::critique_prompt;

#[derive(Debug, Deserialize)]
struct Review {
    score: i64,
    #[serde(default)]
    feedback: String,
}

/// Asks the model to score the latest plan 1 to 5.
///
/// A score below the threshold stores the feedback and routes `Revise`; at
/// or above it routes `Continue`. The revision cap (when set) forces
/// `Continue` once `ctx.revision_count` reaches it, so a harsh reviewer
/// cannot loop the run forever.
pub struct CritiqueNode {
    llm: Arc<dyn LlmClient>,
    threshold: i64,
    max_revisions: Option<u32>,
    attempts: u32,
}

impl CritiqueNode {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        threshold: i64,
        max_revisions: Option<u32>,
        attempts: u32,
    ) -> Self {
        CritiqueNode {
            llm,
            threshold,
            max_revisions,
            attempts,
        }
    }

    /// One prompt, up to `attempts` completion attempts. Transport failures
    /// propagate immediately (the outer retry wrapper owns those); parse
    /// failures burn an attempt and re-prompt.
    async fn review(&self, prompt: &str) -> Result<Review, AgentError> {
        let attempts = self.attempts.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let raw = self.llm.complete(prompt).await?;
            match repair::parse_object(&raw) {
                Ok(review) => return Ok(review),
                Err(err) => {
                    if attempt >= attempts {
                        return Err(err);
                    }
                    tracing::warn!(attempt, error = %err, "unusable review, re-prompting");
                }
            }
        }
    }
}

#[async_trait]
impl Node<Context, Params> for CritiqueNode {
    async fn invoke(&self, ctx: &mut Context, _params: &Params) -> Result<Outcome, AgentError> {
        let plan = match ctx.thoughts.last() {
            Some(last) => render_plan(&last.planning),
            None => return Ok(Outcome::route(Action::Continue)),
        };
        if let Some(cap) = self.max_revisions {
            if ctx.revision_count >= cap {
                tracing::info!(cap, "revision cap reached, skipping critique");
                return Ok(Outcome::route(Action::Continue));
            }
        }
        let review = self.review(&critique_prompt(&plan)).await?;
        tracing::info!(score = review.score, "plan reviewed");
        if review.score < self.threshold {
            ctx.revision_feedback = Some(review.feedback);
            ctx.revision_count += 1;
            return Ok(Outcome::route(Action::Revise));
        }
        Ok(Outcome::route(Action::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::plan::Step;
    use crate::thought::Thought;

    fn ctx_with_plan() -> Context {
        Context {
            thoughts: vec![Thought {
                thought_number: 1,
                current_thinking: "t".to_string(),
                planning: vec![Step::pending("step one")],
                next_action: None,
                next_thought_needed: true,
                final_answer: None,
            }],
            ..Context::default()
        }
    }

    /// **Scenario**: A low score stores feedback, bumps the counter, and
    /// routes Revise.
    #[tokio::test]
    async fn low_score_routes_revise() {
        let llm = Arc::new(MockLlm::always(
            r#"{"score": 2, "feedback": "too vague"}"#,
        ));
        let node = CritiqueNode::new(llm, 4, Some(3), 3);
        let mut ctx = ctx_with_plan();

        let outcome = node.invoke(&mut ctx, &Params::default()).await.unwrap();

        assert_eq!(outcome.action, Action::Revise);
        assert_eq!(ctx.revision_feedback.as_deref(), Some("too vague"));
        assert_eq!(ctx.revision_count, 1);
    }

    /// **Scenario**: A passing score routes Continue and stores nothing.
    #[tokio::test]
    async fn passing_score_routes_continue() {
        let llm = Arc::new(MockLlm::always(r#"{"score": 5, "feedback": "solid"}"#));
        let node = CritiqueNode::new(llm, 4, Some(3), 3);
        let mut ctx = ctx_with_plan();

        let outcome = node.invoke(&mut ctx, &Params::default()).await.unwrap();

        assert_eq!(outcome.action, Action::Continue);
        assert!(ctx.revision_feedback.is_none());
        assert_eq!(ctx.revision_count, 0);
    }

    /// **Scenario**: Once the cap is reached, even a failing score cannot
    /// route Revise; the reviewer is not consulted at all.
    #[tokio::test]
    async fn revision_cap_forces_continue() {
        let llm = Arc::new(MockLlm::always(r#"{"score": 1, "feedback": "bad"}"#));
        let node = CritiqueNode::new(Arc::clone(&llm) as Arc<dyn LlmClient>, 4, Some(2), 3);
        let mut ctx = ctx_with_plan();
        ctx.revision_count = 2;

        let outcome = node.invoke(&mut ctx, &Params::default()).await.unwrap();

        assert_eq!(outcome.action, Action::Continue);
        assert!(llm.prompts().is_empty());
    }

    /// **Scenario**: With no cap configured, revisions keep flowing.
    #[tokio::test]
    async fn uncapped_critique_still_revises() {
        let llm = Arc::new(MockLlm::always(r#"{"score": 1, "feedback": "bad"}"#));
        let node = CritiqueNode::new(llm, 4, None, 3);
        let mut ctx = ctx_with_plan();
        ctx.revision_count = 99;

        let outcome = node.invoke(&mut ctx, &Params::default()).await.unwrap();

        assert_eq!(outcome.action, Action::Revise);
        assert_eq!(ctx.revision_count, 100);
    }

    /// **Scenario**: A review that arrives as prose burns an attempt; the
    /// fresh completion supplies the score, same prompt both times.
    #[tokio::test]
    async fn garbled_review_is_reprompted() {
        let llm = Arc::new(MockLlm::scripted([
            "the plan looks fine to me, maybe a 4 out of 5?".to_string(),
            r#"{"score": 2, "feedback": "tighten step one"}"#.to_string(),
        ]));
        let node = CritiqueNode::new(Arc::clone(&llm) as Arc<dyn LlmClient>, 4, Some(3), 3);
        let mut ctx = ctx_with_plan();

        let outcome = node.invoke(&mut ctx, &Params::default()).await.unwrap();

        assert_eq!(outcome.action, Action::Revise);
        assert_eq!(ctx.revision_feedback.as_deref(), Some("tighten step one"));
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    /// **Scenario**: Persistent garbage exhausts the attempt budget and
    /// surfaces as a parse failure.
    #[tokio::test]
    async fn hopeless_reviews_exhaust_the_budget() {
        let llm = Arc::new(MockLlm::always("no score from me"));
        let node = CritiqueNode::new(Arc::clone(&llm) as Arc<dyn LlmClient>, 4, Some(3), 2);
        let mut ctx = ctx_with_plan();

        let result = node.invoke(&mut ctx, &Params::default()).await;

        assert!(matches!(result, Err(AgentError::ParseFailure { .. })));
        assert_eq!(llm.prompts().len(), 2);
        assert_eq!(ctx.revision_count, 0);
    }
}
