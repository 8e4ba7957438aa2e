//! Response repair pipeline: raw model text in, validated Thought out.
//!
//! Strategies run in fixed priority order, first success wins:
//! 1. JSON on the repaired whole text.
//! 2. JSON on a fenced code block's interior (repaired).
//! 3. JSON on the first balanced top-level `{...}` group of the repaired text.
//! 4. YAML on the whole raw text.
//! 5. YAML on a fenced code block's interior.
//! 6. JSON on every balanced `{...}` substring of the raw text.
//!
//! When all strategies fail the pipeline raises a `ParseFailure` carrying a
//! 500-character sample. Structural success is followed by schema and plan
//! validation; callers retry the whole pipeline (with a fresh completion)
//! up to their configured attempt count.

mod clean;

pub use clean::{
    balanced_objects, closing_suffix, extract_fenced, first_balanced_object, repair_json_text,
};

use serde::de::DeserializeOwned;

use crate::error::AgentError;
use crate::flow::Action;
use crate::plan::{validate_plan, ValidationError, ValidationKind};
use crate::thought::Thought;

/// Parses a semi-structured object of type `T` out of raw model text using
/// the layered fallback strategies.
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T, AgentError> {
    let repaired = repair_json_text(raw);
    if let Ok(v) = serde_json::from_str::<T>(&repaired) {
        return Ok(v);
    }
    tracing::debug!("whole-text JSON parse failed, falling back");

    if let Some(block) = extract_fenced(raw) {
        if let Ok(v) = serde_json::from_str::<T>(&repair_json_text(&block)) {
            return Ok(v);
        }
    }

    if let Some(group) = first_balanced_object(&repaired) {
        if let Ok(v) = serde_json::from_str::<T>(group) {
            return Ok(v);
        }
    }

    if let Ok(v) = serde_yaml::from_str::<T>(raw) {
        return Ok(v);
    }

    if let Some(block) = extract_fenced(raw) {
        if let Ok(v) = serde_yaml::from_str::<T>(&block) {
            return Ok(v);
        }
    }

    for group in balanced_objects(raw) {
        if let Ok(v) = serde_json::from_str::<T>(group) {
            return Ok(v);
        }
    }

    Err(AgentError::parse_failure(raw))
}

/// Structural parse of one Thought, without semantic validation.
pub fn parse_thought(raw: &str) -> Result<Thought, AgentError> {
    parse_object(raw)
}

/// Schema and plan-invariant checks on a structurally parsed thought: the
/// embedded plan must validate, a terminal thought must carry a non-empty
/// `final_answer`, and `next_action` (when present) must name a recognized
/// action.
pub fn validate_thought(thought: &Thought) -> Result<(), AgentError> {
    validate_plan(&thought.planning)?;
    if thought.is_terminal()
        && thought
            .final_answer
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
    {
        return Err(ValidationError::new(ValidationKind::MissingFinalAnswer, "final_answer").into());
    }
    if let Some(action) = thought.next_action.as_deref() {
        action.parse::<Action>()?;
    }
    Ok(())
}

/// Full pipeline: parse, then validate. One failed call site attempt.
pub fn parse_validated_thought(raw: &str) -> Result<Thought, AgentError> {
    let thought = parse_thought(raw)?;
    validate_thought(&thought)?;
    Ok(thought)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StepStatus;

    fn terminal_json(answer: &str) -> String {
        format!(
            r#"{{"current_thinking": "done", "planning": [{{"description": "solve", "status": "Done", "result": "solved"}}], "next_thought_needed": false, "final_answer": "{answer}"}}"#
        )
    }

    /// **Scenario**: Clean JSON parses unchanged — the repair pass loses
    /// nothing on already-valid input.
    #[test]
    fn pipeline_is_idempotent_on_clean_json() {
        let raw = terminal_json("42");
        let first = parse_validated_thought(&raw).unwrap();
        let reserialized = serde_json::to_string(&first).unwrap();
        let second = parse_validated_thought(&reserialized).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    /// **Scenario**: A fenced block buried in prose parses via strategy 2.
    #[test]
    fn fenced_block_parses() {
        let raw = format!("Here is the result:\n```json\n{}\n```\nHope it helps!", terminal_json("4"));
        let thought = parse_validated_thought(&raw).unwrap();
        assert_eq!(thought.final_answer.as_deref(), Some("4"));
    }

    /// **Scenario**: Prose around a bare object parses via balanced-group scanning.
    #[test]
    fn object_embedded_in_prose_parses() {
        let raw = format!("Sure! {} Let me know.", terminal_json("ok"));
        let thought = parse_validated_thought(&raw).unwrap();
        assert_eq!(thought.final_answer.as_deref(), Some("ok"));
    }

    /// **Scenario**: YAML output parses via the secondary format.
    #[test]
    fn yaml_fallback_parses() {
        let raw = "current_thinking: thinking in yaml\nplanning:\n  - description: step one\n    status: Pending\nnext_thought_needed: true\n";
        let thought = parse_validated_thought(raw).unwrap();
        assert_eq!(thought.planning[0].status, StepStatus::Pending);
        assert!(!thought.is_terminal());
    }

    /// **Scenario**: Truncated output is balanced into a parseable thought.
    #[test]
    fn truncated_output_is_repaired() {
        let raw = r#"{"current_thinking": "partial", "next_thought_needed": true, "planning": ["#;
        let thought = parse_thought(raw).unwrap();
        assert!(thought.planning.is_empty());
    }

    /// **Scenario**: Unparseable text raises ParseFailure with a truncated sample.
    #[test]
    fn hopeless_text_raises_parse_failure() {
        let raw = "n".repeat(1000);
        match parse_thought(&raw) {
            Err(AgentError::ParseFailure { sample }) => assert_eq!(sample.len(), 500),
            other => panic!("expected ParseFailure, got {:?}", other),
        }
    }

    /// **Scenario**: A terminal thought without final_answer fails validation.
    #[test]
    fn terminal_without_answer_fails_validation() {
        let raw = r#"{"current_thinking": "done", "planning": [], "next_thought_needed": false}"#;
        match parse_validated_thought(raw) {
            Err(AgentError::Validation(e)) => {
                assert_eq!(e.kind, ValidationKind::MissingFinalAnswer)
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    /// **Scenario**: An unrecognized next_action fails validation distinctly.
    #[test]
    fn unknown_next_action_is_rejected() {
        let raw = r#"{"current_thinking": "t", "planning": [], "next_action": "teleport", "next_thought_needed": true}"#;
        match parse_validated_thought(raw) {
            Err(AgentError::UnknownAction(a)) => assert_eq!(a, "teleport"),
            other => panic!("expected UnknownAction, got {:?}", other),
        }
    }

    /// **Scenario**: An invalid embedded plan aborts the attempt with path info.
    #[test]
    fn invalid_plan_aborts_attempt() {
        let raw = r#"{"current_thinking": "t", "planning": [{"description": "step", "status": "Done"}], "next_thought_needed": true}"#;
        match parse_validated_thought(raw) {
            Err(AgentError::Validation(e)) => {
                assert_eq!(e.kind, ValidationKind::MissingResult);
                assert_eq!(e.path, "planning[0]");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
