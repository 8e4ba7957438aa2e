//! Hierarchical plan model: ordered steps with a status and status-specific
//! companion fields, nested to unbounded depth via `sub_steps`.
//!
//! The model is deliberately permissive at the serde layer (unknown statuses
//! deserialize as `StepStatus::Other`) so that the validator, not the parser,
//! owns rejection and can report a deterministic `(kind, path)` pair.

mod validate;

pub use validate::{validate_plan, ValidationError, ValidationKind};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status of one plan step.
///
/// Wire spellings follow the prompt contract: `"Pending"`, `"Done"`,
/// `"Verification Needed"`, `"Search Needed"`. Anything else round-trips
/// through `Other` and is rejected by [`validate_plan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Done,
    VerificationNeeded,
    SearchNeeded,
    /// Unrecognized wire value, preserved verbatim for the validator.
    Other(String),
}

impl StepStatus {
    /// Wire spelling of this status.
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "Pending",
            StepStatus::Done => "Done",
            StepStatus::VerificationNeeded => "Verification Needed",
            StepStatus::SearchNeeded => "Search Needed",
            StepStatus::Other(s) => s,
        }
    }

    fn from_wire(s: &str) -> Self {
        match s {
            "Pending" => StepStatus::Pending,
            "Done" => StepStatus::Done,
            "Verification Needed" => StepStatus::VerificationNeeded,
            "Search Needed" => StepStatus::SearchNeeded,
            other => StepStatus::Other(other.to_string()),
        }
    }
}

impl Default for StepStatus {
    /// A step with no status field validates as unrecognized, not as Pending.
    fn default() -> Self {
        StepStatus::Other(String::new())
    }
}

impl Serialize for StepStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StepStatus::from_wire(&s))
    }
}

/// One unit of the plan: a description, a status, the companion field the
/// status requires, and nested sub-steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// What this step does. Must be non-empty.
    #[serde(default)]
    pub description: String,
    /// Current status; drives which companion field is required.
    #[serde(default)]
    pub status: StepStatus,
    /// Concise outcome; required and non-empty iff status is `Done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Search query; required and non-empty iff status is `Search Needed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Verification note; required and non-empty iff status is `Verification Needed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<String>,
    /// Nested sub-steps, recursive to unbounded depth.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_steps: Vec<Step>,
}

impl Step {
    /// A pending step with just a description.
    pub fn pending(description: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            status: StepStatus::Pending,
            ..Step::default()
        }
    }

    /// A done step with its result.
    pub fn done(description: impl Into<String>, result: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            status: StepStatus::Done,
            result: Some(result.into()),
            ..Step::default()
        }
    }

    /// A step waiting on a search query.
    pub fn search(description: impl Into<String>, query: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            status: StepStatus::SearchNeeded,
            query: Some(query.into()),
            ..Step::default()
        }
    }
}

/// Renders a plan as an indented checklist, one `- [Status] description` line
/// per step, with result and mark appended when present.
pub fn render_plan(steps: &[Step]) -> String {
    let mut out = String::new();
    render_into(steps, 0, &mut out);
    out
}

fn render_into(steps: &[Step], indent: usize, out: &mut String) {
    for step in steps {
        for _ in 0..indent {
            out.push_str("  ");
        }
        out.push_str("- [");
        out.push_str(step.status.as_str());
        out.push_str("] ");
        out.push_str(&step.description);
        if let Some(result) = step.result.as_deref().filter(|r| !r.is_empty()) {
            out.push_str(" -> ");
            out.push_str(result);
        }
        if let Some(mark) = step.mark.as_deref().filter(|m| !m.is_empty()) {
            out.push_str(" !! ");
            out.push_str(mark);
        }
        out.push('\n');
        if !step.sub_steps.is_empty() {
            render_into(&step.sub_steps, indent + 1, out);
        }
    }
}

/// Collects, depth-first, the query of every `Search Needed` step in the plan.
pub fn search_queries(steps: &[Step]) -> Vec<String> {
    let mut queries = Vec::new();
    collect_queries(steps, &mut queries);
    queries
}

fn collect_queries(steps: &[Step], out: &mut Vec<String>) {
    for step in steps {
        if step.status == StepStatus::SearchNeeded {
            if let Some(query) = step.query.as_deref().filter(|q| !q.trim().is_empty()) {
                out.push(query.to_string());
            }
        }
        collect_queries(&step.sub_steps, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Wire spellings with spaces round-trip through serde.
    #[test]
    fn status_round_trips_wire_spellings() {
        for status in [
            StepStatus::Pending,
            StepStatus::Done,
            StepStatus::VerificationNeeded,
            StepStatus::SearchNeeded,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: StepStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    /// **Scenario**: An unknown status string is preserved, not rejected, by serde.
    #[test]
    fn unknown_status_deserializes_as_other() {
        let status: StepStatus = serde_json::from_str("\"Blocked\"").unwrap();
        assert_eq!(status, StepStatus::Other("Blocked".to_string()));
    }

    /// **Scenario**: Rendering shows status, description, result, and nesting.
    #[test]
    fn render_plan_indents_sub_steps() {
        let mut step = Step::done("outer", "ok");
        step.sub_steps.push(Step::pending("inner"));
        let text = render_plan(&[step]);
        assert!(text.contains("- [Done] outer -> ok"), "got: {}", text);
        assert!(text.contains("  - [Pending] inner"), "got: {}", text);
    }

    /// **Scenario**: Queries are collected from nested `Search Needed` steps, in order.
    #[test]
    fn search_queries_walks_sub_steps() {
        let mut outer = Step::search("find a", "query a");
        outer.sub_steps.push(Step::search("find b", "query b"));
        let plan = vec![outer, Step::pending("later")];
        assert_eq!(search_queries(&plan), vec!["query a", "query b"]);
    }
}
