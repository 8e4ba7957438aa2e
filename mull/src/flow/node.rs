//! Node trait: one unit of work in a flow.
//!
//! Receives mutable context `C` and immutable params `P`, returns an
//! [`Outcome`] (routing action plus optional payload). Implementations must
//! be safe to call repeatedly with evolving context; the flow loop re-invokes
//! the same node instance on self-edges.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;

use super::Action;

/// Routing result of one node invocation.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Selects the next node via the flow's edge table; an action with no
    /// registered edge terminates the flow.
    pub action: Action,
    /// Payload returned to the caller when this outcome terminates the flow.
    pub value: Option<Value>,
}

impl Outcome {
    /// Outcome carrying both an action and a payload.
    pub fn new(action: Action, value: Option<Value>) -> Self {
        Outcome { action, value }
    }

    /// Pure routing outcome with no payload.
    pub fn route(action: Action) -> Self {
        Outcome {
            action,
            value: None,
        }
    }

    /// Terminal outcome carrying the run's value.
    pub fn end(value: Value) -> Self {
        Outcome {
            action: Action::End,
            value: Some(value),
        }
    }
}

/// One unit of work: context and params in, `(action, value)` out.
///
/// **Interaction**: held as `Arc<dyn Node<C, P>>` by [`super::Flow`] edge
/// tables and by [`super::Retry`]; the agent's reasoning and auxiliary nodes
/// implement it over the agent's `Context`/`Params` types.
#[async_trait]
pub trait Node<C, P>: Send + Sync
where
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Runs one step against the shared context.
    async fn invoke(&self, ctx: &mut C, params: &P) -> Result<Outcome, AgentError>;
}
