//! Closed set of routing labels.
//!
//! Model output names actions as strings; parsing into this enum is the only
//! way in, so an unrecognized label is a distinct error instead of a silent
//! self-loop.

use std::fmt;
use std::str::FromStr;

use crate::error::AgentError;

/// Routing label returned by a node, used to select the next node in a flow.
///
/// `End` is the sole terminal action by convention: the agent flow registers
/// no edge for it, so returning `End` terminates the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Loop back into the reasoning step.
    Continue,
    /// Terminate the run.
    End,
    /// Fan out into parallel sub-agents.
    Explore,
    /// Score the current plan.
    Critique,
    /// Fold reviewer feedback back into the problem.
    Revise,
    /// Run one child agent on a sub-problem.
    Spawn,
}

impl Action {
    /// Canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Continue => "continue",
            Action::End => "end",
            Action::Explore => "explore",
            Action::Critique => "critique",
            Action::Revise => "revise",
            Action::Spawn => "spawn",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Action::Continue),
            "end" => Ok(Action::End),
            "explore" => Ok(Action::Explore),
            "critique" => Ok(Action::Critique),
            "revise" => Ok(Action::Revise),
            "spawn" => Ok(Action::Spawn),
            other => Err(AgentError::UnknownAction(other.to_string())),
        }
    }
}
