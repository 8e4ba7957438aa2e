//! Iterative reasoning agent: a self-looping chain-of-thought state machine
//! over a small action-routed flow engine.
//!
//! The crate splits into layers:
//! - [`flow`] — the generic executor: nodes, actions, edge tables, retries,
//!   and batch fan-out.
//! - [`plan`] and [`thought`] — the data model the model emits and the
//!   validator that rejects malformed plans deterministically.
//! - [`repair`] — layered recovery of structured output from messy model
//!   text.
//! - [`llm`], [`search`], [`augment`] — external collaborators behind
//!   traits: completions, web search, page fetching, and the per-run
//!   augmentation cache.
//! - [`agent`] — the reasoning nodes and the orchestrator that wires them.

pub mod agent;
pub mod augment;
pub mod error;
pub mod flow;
pub mod llm;
pub mod plan;
pub mod repair;
pub mod search;
pub mod thought;

pub use agent::{AgentOptions, Context, Orchestrator, Params, RunOutcome};
pub use augment::Augmenter;
pub use error::AgentError;
pub use flow::{Action, BatchFlow, Flow, Node, Outcome, Retry};
pub use llm::{LlmClient, MockLlm, OpenAiChat};
pub use plan::{validate_plan, Step, StepStatus, ValidationError, ValidationKind};
pub use search::{
    FetchedPage, PageFetcher, PageScraper, QwantSearch, SearchClient, SearchError, SearchHit,
};
pub use thought::Thought;
