//! Revision: fold critique feedback back into the problem statement.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::flow::{Action, Node, Outcome};

use super::context::{Context, Params};

/// Consumes `revision_feedback` (removing it from the context) and appends
/// it to the problem as a reviewer note, so the next reasoning iteration
/// sees it. Routes `Continue` whether or not feedback was present.
pub struct ReviseNode;

#[async_trait]
impl Node<Context, Params> for ReviseNode {
    async fn invoke(&self, ctx: &mut Context, _params: &Params) -> Result<Outcome, AgentError> {
        if let Some(feedback) = ctx.revision_feedback.take() {
            ctx.problem.push_str("\nReviewer feedback: ");
            ctx.problem.push_str(&feedback);
            tracing::info!("revision feedback folded into problem");
        }
        Ok(Outcome::route(Action::Continue))
    }
}
