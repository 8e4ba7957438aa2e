//! Plan validator: depth-first, pre-order walk with fail-fast semantics.
//!
//! Check order per step: description present, status recognized, status
//! companion field present and non-empty, then recurse into `sub_steps`.
//! The first violation in traversal order wins, so error messages are
//! deterministic for a given plan.

use std::fmt;

use thiserror::Error;

use super::{Step, StepStatus};

/// What rule a step violated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationKind {
    /// `description` missing or empty.
    EmptyDescription,
    /// `status` is not one of the recognized values.
    UnknownStatus(String),
    /// Status is `Done` but `result` is missing or empty.
    MissingResult,
    /// Status is `Search Needed` but `query` is missing or empty.
    MissingQuery,
    /// Status is `Verification Needed` but `mark` is missing or empty.
    MissingMark,
    /// A terminal thought is missing its `final_answer`.
    MissingFinalAnswer,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::EmptyDescription => write!(f, "step description is empty"),
            ValidationKind::UnknownStatus(s) => write!(f, "unrecognized status {:?}", s),
            ValidationKind::MissingResult => write!(f, "Done step has no result"),
            ValidationKind::MissingQuery => write!(f, "Search Needed step has no query"),
            ValidationKind::MissingMark => write!(f, "Verification Needed step has no mark"),
            ValidationKind::MissingFinalAnswer => {
                write!(f, "terminal thought has no final_answer")
            }
        }
    }
}

/// A plan (or thought schema) invariant violation at a specific path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid plan at {path}: {kind}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    /// Traversal path, e.g. `planning[1].sub_steps[0]`.
    pub path: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, path: impl Into<String>) -> Self {
        ValidationError {
            kind,
            path: path.into(),
        }
    }
}

/// Validates every step of a plan recursively, failing on the first
/// violation found in depth-first pre-order.
pub fn validate_plan(steps: &[Step]) -> Result<(), ValidationError> {
    walk(steps, "planning")
}

fn walk(steps: &[Step], prefix: &str) -> Result<(), ValidationError> {
    for (i, step) in steps.iter().enumerate() {
        let path = format!("{prefix}[{i}]");
        if step.description.trim().is_empty() {
            return Err(ValidationError::new(ValidationKind::EmptyDescription, path));
        }
        match &step.status {
            StepStatus::Other(s) => {
                return Err(ValidationError::new(
                    ValidationKind::UnknownStatus(s.clone()),
                    path,
                ));
            }
            StepStatus::Done => {
                require(&step.result, ValidationKind::MissingResult, &path)?;
            }
            StepStatus::SearchNeeded => {
                require(&step.query, ValidationKind::MissingQuery, &path)?;
            }
            StepStatus::VerificationNeeded => {
                require(&step.mark, ValidationKind::MissingMark, &path)?;
            }
            StepStatus::Pending => {}
        }
        if !step.sub_steps.is_empty() {
            walk(&step.sub_steps, &format!("{path}.sub_steps"))?;
        }
    }
    Ok(())
}

fn require(
    field: &Option<String>,
    kind: ValidationKind,
    path: &str,
) -> Result<(), ValidationError> {
    match field.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::new(kind, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_plan() -> Vec<Step> {
        let mut outer = Step::done("research topic", "sources collected");
        outer
            .sub_steps
            .push(Step::search("check recency", "topic 2025"));
        vec![outer, Step::pending("draft answer")]
    }

    /// **Scenario**: A plan where every step satisfies its companion-field rule validates.
    #[test]
    fn accepts_valid_plan() {
        assert!(validate_plan(&valid_plan()).is_ok());
    }

    /// **Scenario**: Removing the result from any Done step always flips validation to failure.
    #[test]
    fn done_without_result_fails() {
        let mut plan = valid_plan();
        plan[0].result = None;
        let err = validate_plan(&plan).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MissingResult);
        assert_eq!(err.path, "planning[0]");

        let mut plan = valid_plan();
        plan[0].result = Some("   ".to_string());
        assert!(validate_plan(&plan).is_err());
    }

    /// **Scenario**: Violations in nested sub-steps report the full traversal path.
    #[test]
    fn nested_violation_reports_path() {
        let mut plan = valid_plan();
        plan[0].sub_steps[0].query = None;
        let err = validate_plan(&plan).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MissingQuery);
        assert_eq!(err.path, "planning[0].sub_steps[0]");
    }

    /// **Scenario**: An unrecognized status is rejected with the offending value.
    #[test]
    fn unknown_status_fails() {
        let mut plan = valid_plan();
        plan[1].status = StepStatus::Other("Paused".to_string());
        let err = validate_plan(&plan).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationKind::UnknownStatus("Paused".to_string())
        );
        assert_eq!(err.path, "planning[1]");
    }

    /// **Scenario**: Empty description wins over a later status violation (fail-fast order).
    #[test]
    fn description_checked_before_status() {
        let step = Step {
            description: String::new(),
            status: StepStatus::Other("Bogus".to_string()),
            ..Step::default()
        };
        let err = validate_plan(&[step]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::EmptyDescription);
    }

    /// **Scenario**: Verification Needed requires a non-empty mark.
    #[test]
    fn verification_without_mark_fails() {
        let step = Step {
            description: "verify the total".to_string(),
            status: StepStatus::VerificationNeeded,
            ..Step::default()
        };
        let err = validate_plan(&[step]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MissingMark);
    }
}
