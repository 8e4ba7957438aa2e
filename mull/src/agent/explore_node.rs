//! Parallel exploration: one fresh reasoning loop per sub-problem.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::flow::{Action, Node, Outcome};

use super::context::{Context, Params};
use super::reason_node::ReasonNode;

/// Runs an independent reasoning loop for each sub-problem, concurrently,
/// each over a child fork of the context.
///
/// Answers land in `ctx.candidates` in sub-problem order regardless of
/// completion order. An empty sub-problem list is a no-op `Continue`. Any
/// worker failure fails the whole exploration.
pub struct ParallelExploreNode {
    reason: Arc<ReasonNode>,
}

impl ParallelExploreNode {
    pub fn new(reason: Arc<ReasonNode>) -> Self {
        ParallelExploreNode { reason }
    }

    async fn worker(&self, parent: &Context, sub_problem: &str) -> Result<Value, AgentError> {
        let mut ctx = parent.child();
        let params = Params::for_problem(sub_problem);
        loop {
            let outcome = self.reason.invoke(&mut ctx, &params).await?;
            if outcome.action == Action::End {
                return Ok(outcome.value.unwrap_or(Value::Null));
            }
        }
    }
}

#[async_trait]
impl Node<Context, Params> for ParallelExploreNode {
    async fn invoke(&self, ctx: &mut Context, params: &Params) -> Result<Outcome, AgentError> {
        if params.sub_problems.is_empty() {
            return Ok(Outcome::route(Action::Continue));
        }
        tracing::info!(count = params.sub_problems.len(), "exploring sub-problems");
        let workers = params
            .sub_problems
            .iter()
            .map(|sub| self.worker(ctx, sub));
        let answers = futures::future::try_join_all(workers).await?;
        ctx.candidates.extend(answers);
        Ok(Outcome::route(Action::Continue))
    }
}
