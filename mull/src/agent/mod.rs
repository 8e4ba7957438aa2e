//! The reasoning agent: shared state, prompts, nodes, and the orchestrator.
//!
//! One run is a flow over [`Context`]: the reasoning node loops via
//! `Continue` until a terminal thought carries the final answer, with the
//! auxiliary nodes (exploration, critique, revision, spawning) reachable
//! when branching is enabled.

mod context;
mod critique_node;
mod explore_node;
mod prompt;
mod reason_node;
mod revise_node;
mod runner;
mod spawn_node;

pub use context::{Context, Params};
pub use critique_node::CritiqueNode;
pub use explore_node::ParallelExploreNode;
pub use prompt::{critique_prompt, history_text, reasoning_prompt};
pub use reason_node::ReasonNode;
pub use revise_node::ReviseNode;
pub use runner::{AgentOptions, Orchestrator, RunOutcome};
pub use spawn_node::SpawnAgentNode;
