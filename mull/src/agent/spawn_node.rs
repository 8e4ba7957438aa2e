//! Sub-agent spawning: a full child reasoning flow for one sub-problem.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::flow::{Action, Flow, Node, Outcome};

use super::context::{Context, Params};
use super::reason_node::ReasonNode;

/// Runs a complete child reasoning flow over a context fork for the
/// params-supplied sub-problem, then appends the child's answer to
/// `ctx.sub_answers`.
///
/// The child flow carries a Continue self-edge so it loops to its own
/// terminal thought; without a sub-problem the node is a no-op `Continue`.
pub struct SpawnAgentNode {
    reason: Arc<ReasonNode>,
}

impl SpawnAgentNode {
    pub fn new(reason: Arc<ReasonNode>) -> Self {
        SpawnAgentNode { reason }
    }
}

#[async_trait]
impl Node<Context, Params> for SpawnAgentNode {
    async fn invoke(&self, ctx: &mut Context, params: &Params) -> Result<Outcome, AgentError> {
        let sub_problem = match params.sub_problem.as_deref() {
            Some(sub) if !sub.trim().is_empty() => sub,
            _ => return Ok(Outcome::route(Action::Continue)),
        };
        tracing::info!(sub_problem, "spawning sub-agent");
        let mut child = ctx.child();
        let child_params = Params::for_problem(sub_problem);
        let node = Arc::clone(&self.reason) as Arc<dyn Node<Context, Params>>;
        let mut flow = Flow::new(Arc::clone(&node));
        flow.edge(Action::Continue, node);
        let answer = flow.run(&mut child, &child_params, None).await?;
        ctx.sub_answers.push(answer.unwrap_or(Value::Null));
        Ok(Outcome::route(Action::Continue))
    }
}
