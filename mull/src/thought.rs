//! One complete reasoning iteration's recorded output.
//!
//! A `Thought` is what the repair pipeline produces from raw model text and
//! what the reasoning node appends to the audit trail. The most recent
//! thought is authoritative for routing; past thoughts are never mutated.

use serde::{Deserialize, Serialize};

use crate::plan::Step;

/// One reasoning iteration: free-text thinking, the updated plan, and the
/// routing decision for the next iteration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thought {
    /// 1-based, strictly increasing within a run. Assigned by the reasoning
    /// node; a model-supplied value is overwritten.
    #[serde(default)]
    pub thought_number: u32,
    /// Free-text reasoning for this iteration.
    pub current_thinking: String,
    /// The full plan as of this iteration.
    pub planning: Vec<Step>,
    /// Model-chosen routing label (`continue`, `explore`, `critique`,
    /// `revise`, `spawn`). Absent means continue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    /// False marks termination; the thought must then carry `final_answer`.
    pub next_thought_needed: bool,
    /// Final answer, required when `next_thought_needed` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,
}

impl Thought {
    /// True when this thought terminates the run.
    pub fn is_terminal(&self) -> bool {
        !self.next_thought_needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Missing optional fields deserialize to their defaults.
    #[test]
    fn optional_fields_default() {
        let thought: Thought = serde_json::from_str(
            r#"{"current_thinking": "t", "planning": [], "next_thought_needed": true}"#,
        )
        .unwrap();
        assert_eq!(thought.thought_number, 0);
        assert!(thought.next_action.is_none());
        assert!(thought.final_answer.is_none());
        assert!(!thought.is_terminal());
    }

    /// **Scenario**: Missing required fields make deserialization fail.
    #[test]
    fn missing_required_field_is_an_error() {
        let res: Result<Thought, _> =
            serde_json::from_str(r#"{"planning": [], "next_thought_needed": true}"#);
        assert!(res.is_err());
    }
}
