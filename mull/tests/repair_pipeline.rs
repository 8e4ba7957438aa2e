//! Repair pipeline against realistic messy completions: several defects at
//! once, the way models actually fail.

use mull::repair::{parse_thought, parse_validated_thought};
use mull::plan::StepStatus;
use mull::AgentError;

/// **Scenario**: Prose, a fenced block, a trailing comma, and an invalid
/// escape in one completion still parse into a valid thought.
#[test]
fn fenced_block_with_trailing_comma_and_bad_escape() {
    let raw = r#"Sure thing! Here's my reasoning step:

```json
{
  "current_thinking": "The file lives at C:\docs\archive",
  "planning": [
    {"description": "locate the file", "status": "Done", "result": "found it",},
  ],
  "next_thought_needed": true
}
```

Let me know if you need anything else."#;

    let thought = parse_validated_thought(raw).unwrap();
    assert!(thought.current_thinking.contains("C:\\docs\\archive"));
    assert_eq!(thought.planning[0].status, StepStatus::Done);
}

/// **Scenario**: A completion cut off mid-plan is balanced into a parseable
/// structure; validation then flags the incomplete step, so the caller
/// re-prompts instead of crashing.
#[test]
fn truncated_completion_is_balanced() {
    let raw = r#"{"current_thinking": "listing the steps now", "next_thought_needed": true, "planning": [{"description": "first st"#;

    let thought = parse_thought(raw).unwrap();
    assert_eq!(thought.planning.len(), 1);
    assert_eq!(thought.planning[0].description, "first st");
    assert!(matches!(
        parse_validated_thought(raw),
        Err(AgentError::Validation(_))
    ));
}

/// **Scenario**: A model that answers in YAML instead of JSON still parses.
#[test]
fn yaml_completion_parses() {
    let raw = "current_thinking: answering in yaml today\n\
               planning:\n\
               - description: assess the question\n\
               \x20 status: Done\n\
               \x20 result: assessed\n\
               next_thought_needed: false\n\
               final_answer: the yaml answer\n";

    let thought = parse_validated_thought(raw).unwrap();
    assert!(thought.is_terminal());
    assert_eq!(thought.final_answer.as_deref(), Some("the yaml answer"));
}

/// **Scenario**: Multiple JSON objects in one completion; the scanner finds
/// the one that matches the schema.
#[test]
fn schema_matching_object_wins() {
    let raw = r#"metadata {"model": "x"} result {"current_thinking": "t", "planning": [], "next_thought_needed": true} trailing"#;

    let thought = parse_validated_thought(raw).unwrap();
    assert_eq!(thought.current_thinking, "t");
}

/// **Scenario**: Hopeless text fails with a truncated sample, never a panic.
#[test]
fn hopeless_text_fails_cleanly() {
    let raw = format!("The answer is probably fine. {}", "blah ".repeat(500));
    match parse_validated_thought(&raw) {
        Err(AgentError::ParseFailure { sample }) => {
            assert_eq!(sample.chars().count(), 500);
            assert!(raw.starts_with(&sample));
        }
        other => panic!("expected ParseFailure, got {:?}", other),
    }
}
