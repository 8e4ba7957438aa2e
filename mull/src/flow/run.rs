//! Flow and BatchFlow: iterative routing over the edge table.
//!
//! `Flow::run` is an explicit loop with an exit condition of "no outgoing
//! edge for this action" — plans may loop indefinitely, so the engine never
//! recurses. The optional semaphore is a counting permit shared across all
//! concurrently running flow instances, gating node invocations globally
//! rather than per flow.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;

use crate::error::AgentError;

use super::{Action, Node};

/// Directed graph of nodes keyed by routing action.
///
/// The edge table maps each action to the node that handles it; registering
/// the same action twice overwrites the earlier edge (last write wins). An
/// action with no edge terminates the flow and hands the node's value back
/// to the caller.
pub struct Flow<C, P> {
    start: Arc<dyn Node<C, P>>,
    edges: HashMap<Action, Arc<dyn Node<C, P>>>,
}

impl<C, P> Flow<C, P>
where
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Creates a flow starting at `start` with an empty edge table.
    pub fn new(start: Arc<dyn Node<C, P>>) -> Self {
        Flow {
            start,
            edges: HashMap::new(),
        }
    }

    /// Registers a directed transition; last write wins for a given action.
    pub fn edge(&mut self, action: Action, node: Arc<dyn Node<C, P>>) -> &mut Self {
        self.edges.insert(action, node);
        self
    }

    /// Runs the graph once: invoke the current node, route by its action,
    /// stop at the first action with no edge and return the last value.
    ///
    /// When `gate` is given, one permit is held per node invocation; the
    /// same semaphore may be shared by many flows to bound total in-flight
    /// node work.
    pub async fn run(
        &self,
        ctx: &mut C,
        params: &P,
        gate: Option<&Semaphore>,
    ) -> Result<Option<Value>, AgentError> {
        let mut current = Arc::clone(&self.start);
        loop {
            let outcome = match gate {
                Some(sem) => {
                    let _permit = sem
                        .acquire()
                        .await
                        .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;
                    current.invoke(ctx, params).await?
                }
                None => current.invoke(ctx, params).await?,
            };
            tracing::debug!(action = %outcome.action, "node completed");
            match self.edges.get(&outcome.action) {
                Some(next) => current = Arc::clone(next),
                None => return Ok(outcome.value),
            }
        }
    }
}

/// Runs one flow instance per params entry, concurrently, over per-instance
/// clones of the context.
///
/// Results are collected in input order regardless of completion order; if
/// any instance fails the whole batch fails and sibling results are
/// abandoned (no partial-result contract).
pub struct BatchFlow<C, P> {
    flow: Flow<C, P>,
}

impl<C, P> BatchFlow<C, P>
where
    C: Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    pub fn new(flow: Flow<C, P>) -> Self {
        BatchFlow { flow }
    }

    /// Runs the flow once per entry of `params_list`, all sharing one
    /// concurrency gate of `max_parallel` permits (unbounded when `None`).
    pub async fn run(
        &self,
        ctx: &C,
        params_list: &[P],
        max_parallel: Option<usize>,
    ) -> Result<Vec<Option<Value>>, AgentError> {
        let gate = max_parallel.map(|n| Arc::new(Semaphore::new(n)));
        let runs = params_list.iter().map(|params| {
            let mut local = ctx.clone();
            let gate = gate.clone();
            async move { self.flow.run(&mut local, params, gate.as_deref()).await }
        });
        futures::future::try_join_all(runs).await
    }
}
