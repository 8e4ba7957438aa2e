//! Shared run state and per-run parameters.

use std::collections::HashMap;

use serde_json::Value;

use crate::search::{FetchedPage, SearchHit};
use crate::thought::Thought;

/// Mutable state shared by every node of one reasoning run.
///
/// `Clone` is the forking mechanism: exploration workers and spawned
/// sub-agents each get a snapshot taken at fork time and never write back,
/// so no synchronization is needed between sibling runs.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// The problem under consideration. Mutated only by revision notes.
    pub problem: String,
    /// Append-only audit trail of reasoning iterations.
    pub thoughts: Vec<Thought>,
    /// 1-based counter, incremented per reasoning invocation.
    pub current_thought_number: u32,
    /// Final answer, set exactly once by the terminal thought.
    pub solution: Option<String>,
    /// Answers gathered by parallel exploration, in sub-problem order.
    pub candidates: Vec<Value>,
    /// Answers gathered by spawned sub-agents, in spawn order.
    pub sub_answers: Vec<Value>,
    /// Feedback from the latest critique, consumed by revision.
    pub revision_feedback: Option<String>,
    /// Critique-triggered revisions so far, compared against the cap.
    pub revision_count: u32,
    /// Query to search hits, one search per query per run.
    pub search_results: HashMap<String, Vec<SearchHit>>,
    /// URL to fetch outcome, one fetch per URL per run.
    pub scraped_content: HashMap<String, FetchedPage>,
}

impl Context {
    /// Fork for a child run: the snapshot minus the parent's problem and
    /// solution, which belong to the parent alone. Caches carry over so the
    /// child reuses already-fetched material.
    pub fn child(&self) -> Context {
        let mut child = self.clone();
        child.problem = String::new();
        child.solution = None;
        child
    }
}

/// Immutable per-run parameter bundle. Constructed once, never mutated.
#[derive(Clone, Debug, Default)]
pub struct Params {
    /// Problem seeded into an empty context on the first reasoning call.
    pub problem: Option<String>,
    /// Sub-problems for parallel exploration.
    pub sub_problems: Vec<String>,
    /// Sub-problem for a spawned sub-agent.
    pub sub_problem: Option<String>,
}

impl Params {
    pub fn for_problem(problem: impl Into<String>) -> Self {
        Params {
            problem: Some(problem.into()),
            ..Params::default()
        }
    }

    pub fn for_sub_problems<I, S>(sub_problems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Params {
            sub_problems: sub_problems.into_iter().map(Into::into).collect(),
            ..Params::default()
        }
    }

    pub fn for_sub_problem(sub_problem: impl Into<String>) -> Self {
        Params {
            sub_problem: Some(sub_problem.into()),
            ..Params::default()
        }
    }
}
