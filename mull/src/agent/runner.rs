//! Orchestrator: wires the reasoning flow and drives one run end to end.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::augment::Augmenter;
use crate::error::AgentError;
use crate::flow::{Action, Flow, Node, Retry};
use crate::llm::LlmClient;

use super::context::{Context, Params};
use super::critique_node::CritiqueNode;
use super::explore_node::ParallelExploreNode;
use super::reason_node::ReasonNode;
use super::revise_node::ReviseNode;
use super::spawn_node::SpawnAgentNode;

/// Tuning knobs for one agent instance.
#[derive(Clone, Debug)]
pub struct AgentOptions {
    /// Thoughts kept in the prompt history.
    pub history_window: usize,
    /// Completion attempts per model call (reasoning and critique) before a
    /// parse failure is fatal.
    pub llm_attempts: u32,
    /// Allow the model to route explore/critique/revise/spawn.
    pub branching: bool,
    /// Revisions allowed per run; `None` removes the cap.
    pub max_revisions: Option<u32>,
    /// Minimum critique score that passes without revision.
    pub score_threshold: i64,
    /// Echo each thought's plan to stdout.
    pub narrate: bool,
    /// Transport-level attempts around each reasoning invocation.
    pub transport_tries: u32,
    /// Base delay between transport retries.
    pub backoff: Duration,
    /// Randomize the backoff growth.
    pub jitter: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        AgentOptions {
            history_window: 10,
            llm_attempts: 3,
            branching: false,
            max_revisions: Some(3),
            score_threshold: 4,
            narrate: false,
            transport_tries: 3,
            backoff: Duration::from_secs(1),
            jitter: true,
        }
    }
}

/// What a finished run hands back.
#[derive(Debug)]
pub struct RunOutcome {
    /// The terminal thought's final answer.
    pub solution: Option<String>,
    /// The value returned by the flow (normally the answer as a JSON string).
    pub value: Option<Value>,
    /// Full final state, audit trail included.
    pub context: Context,
}

/// Owns the wired flow. The edge table routes `Continue` back into the
/// (retry-wrapped) reasoning node and, when branching is enabled, the four
/// auxiliary actions to their nodes; `End` stays unrouted and terminates.
pub struct Orchestrator {
    flow: Flow<Context, Params>,
    narrate: bool,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        augmenter: Option<Arc<Augmenter>>,
        options: AgentOptions,
    ) -> Self {
        let reason = Arc::new(ReasonNode::new(
            Arc::clone(&llm),
            augmenter,
            options.clone(),
        ));
        let guarded: Arc<dyn Node<Context, Params>> = Arc::new(Retry::new(
            Arc::clone(&reason) as Arc<dyn Node<Context, Params>>,
            options.transport_tries,
            options.backoff,
            options.jitter,
        ));
        let mut flow = Flow::new(Arc::clone(&guarded));
        flow.edge(Action::Continue, guarded);
        if options.branching {
            flow.edge(
                Action::Explore,
                Arc::new(ParallelExploreNode::new(Arc::clone(&reason))),
            );
            // The critique call gets the same transport guard as reasoning.
            flow.edge(
                Action::Critique,
                Arc::new(Retry::new(
                    Arc::new(CritiqueNode::new(
                        llm,
                        options.score_threshold,
                        options.max_revisions,
                        options.llm_attempts,
                    )) as Arc<dyn Node<Context, Params>>,
                    options.transport_tries,
                    options.backoff,
                    options.jitter,
                )),
            );
            flow.edge(Action::Revise, Arc::new(ReviseNode));
            flow.edge(Action::Spawn, Arc::new(SpawnAgentNode::new(reason)));
        }
        Orchestrator {
            flow,
            narrate: options.narrate,
        }
    }

    /// Drives one problem to its final answer.
    pub async fn run(&self, problem: impl Into<String>) -> Result<RunOutcome, AgentError> {
        let mut ctx = Context::default();
        let params = Params::for_problem(problem);
        tracing::info!("run started");
        let value = self.flow.run(&mut ctx, &params, None).await?;
        tracing::info!(
            thoughts = ctx.thoughts.len(),
            solved = ctx.solution.is_some(),
            "run finished"
        );
        if self.narrate {
            if let Some(solution) = &ctx.solution {
                println!("\n{solution}");
            }
        }
        Ok(RunOutcome {
            solution: ctx.solution.clone(),
            value,
            context: ctx,
        })
    }
}
