use thiserror::Error;

use crate::model::ids::{ModuleId, PhaseId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("activity question cannot be empty")]
    EmptyQuestion,

    #[error("activity must have at least one option")]
    NoOptions,

    #[error("correct index {index} out of range for {count} options")]
    CorrectIndexOutOfRange { index: usize, count: usize },
}

//
// ─── ACTIVITY ──────────────────────────────────────────────────────────────────
//

/// A single quiz question attached to a module.
///
/// `correct_index` is the answer position as authored (the canonical index
/// space). Display ordering is derived separately via the seeded shuffle;
/// the option list is never resized after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Activity {
    /// Build a validated activity.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError` if the question is blank, the option list is
    /// empty, or `correct_index` does not index into the options.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ActivityError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(ActivityError::EmptyQuestion);
        }
        if options.is_empty() {
            return Err(ActivityError::NoOptions);
        }
        if correct_index >= options.len() {
            return Err(ActivityError::CorrectIndexOutOfRange {
                index: correct_index,
                count: options.len(),
            });
        }

        Ok(Self {
            question,
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// True if `canonical_index` names the authored correct option.
    #[must_use]
    pub fn is_correct(&self, canonical_index: usize) -> bool {
        canonical_index == self.correct_index
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// One unit of course content with exactly one quiz question.
///
/// Presentation-only material (markdown body, diagram geometry, takeaway
/// lists) is not modeled here; the engine never reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    phase: PhaseId,
    title: String,
    concept: String,
    activity: Activity,
}

impl Module {
    #[must_use]
    pub fn new(
        id: ModuleId,
        phase: PhaseId,
        title: impl Into<String>,
        concept: impl Into<String>,
        activity: Activity,
    ) -> Self {
        Self {
            id,
            phase,
            title: title.into(),
            concept: concept.into(),
            activity,
        }
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> PhaseId {
        self.phase
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    #[must_use]
    pub fn activity(&self) -> &Activity {
        &self.activity
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn builds_valid_activity() {
        let act = Activity::new("Q?", options(), 2, "because").unwrap();
        assert_eq!(act.options().len(), 4);
        assert!(act.is_correct(2));
        assert!(!act.is_correct(0));
    }

    #[test]
    fn rejects_empty_question() {
        let err = Activity::new("   ", options(), 0, "").unwrap_err();
        assert_eq!(err, ActivityError::EmptyQuestion);
    }

    #[test]
    fn rejects_empty_options() {
        let err = Activity::new("Q?", vec![], 0, "").unwrap_err();
        assert_eq!(err, ActivityError::NoOptions);
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Activity::new("Q?", options(), 4, "").unwrap_err();
        assert_eq!(
            err,
            ActivityError::CorrectIndexOutOfRange { index: 4, count: 4 }
        );
    }

    #[test]
    fn module_exposes_fields() {
        let act = Activity::new("Q?", options(), 1, "x").unwrap();
        let module = Module::new(
            ModuleId::new(7),
            PhaseId::new('A').unwrap(),
            "Title",
            "Concept",
            act,
        );
        assert_eq!(module.id(), ModuleId::new(7));
        assert_eq!(module.phase().letter(), 'A');
        assert_eq!(module.title(), "Title");
        assert_eq!(module.activity().correct_index(), 1);
    }
}
