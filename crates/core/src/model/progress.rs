use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ModuleId;
use crate::model::module::Module;

/// XP granted the first time a module's question is answered correctly.
pub const COMPLETION_REWARD: u32 = 50;

/// XP granted for a correct answer in review mode. Repeatable; never gates
/// progression and never touches the streak.
pub const REVIEW_REWARD: u32 = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("answer index {index} out of range for {count} options")]
    AnswerOutOfRange { index: usize, count: usize },
}

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of submitting an answer for the current module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// First correct submission: module completed, reward granted.
    Completed { reward: u32 },
    /// Correct again on an already-completed module; no score or streak change.
    AlreadyCompleted,
    /// Wrong pick; resets the running streak to zero.
    Incorrect,
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// The per-user progress snapshot.
///
/// Every field carries a serde default so snapshots persisted by an older
/// schema merge over fresh defaults instead of failing to deserialize.
/// `completed` and `answers` are keyed by `ModuleId`, not position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub position: usize,
    pub completed: BTreeSet<ModuleId>,
    pub score: u32,
    /// Submitted answer per module, in the canonical (unshuffled) index
    /// space. Only correct submissions are ever recorded, so a stored value
    /// always equals the module's correct index.
    pub answers: BTreeMap<ModuleId, usize>,
    pub streak: u32,
    pub best_streak: u32,
    pub started_at: DateTime<Utc>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            position: 0,
            completed: BTreeSet::new(),
            score: 0,
            answers: BTreeMap::new(),
            streak: 0,
            best_streak: 0,
            started_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Progress {
    /// Fresh progress started at the given instant.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_completed(&self, id: ModuleId) -> bool {
        self.completed.contains(&id)
    }

    #[must_use]
    pub fn answer_for(&self, id: ModuleId) -> Option<usize> {
        self.answers.get(&id).copied()
    }

    /// Submit an answer (canonical index space) for the given module.
    ///
    /// First correct submission completes the module, grants
    /// `COMPLETION_REWARD`, and extends the streak. Repeat correct
    /// submissions are no-ops beyond the outcome. Incorrect submissions
    /// reset the streak and record nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::AnswerOutOfRange` if `canonical_index` does
    /// not index into the module's options.
    pub fn submit_answer(
        &mut self,
        module: &Module,
        canonical_index: usize,
    ) -> Result<AnswerOutcome, ProgressError> {
        let activity = module.activity();
        let count = activity.options().len();
        if canonical_index >= count {
            return Err(ProgressError::AnswerOutOfRange {
                index: canonical_index,
                count,
            });
        }

        if !activity.is_correct(canonical_index) {
            self.streak = 0;
            return Ok(AnswerOutcome::Incorrect);
        }

        self.answers.insert(module.id(), canonical_index);
        if !self.completed.insert(module.id()) {
            return Ok(AnswerOutcome::AlreadyCompleted);
        }

        self.score += COMPLETION_REWARD;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        Ok(AnswerOutcome::Completed {
            reward: COMPLETION_REWARD,
        })
    }

    /// Grant the repeatable review reward for a correct review answer.
    pub fn review_correct(&mut self) -> u32 {
        self.score += REVIEW_REWARD;
        REVIEW_REWARD
    }

    /// Move to the next module, clamped to the last catalog position.
    ///
    /// Unconditional: gating belongs to the caller via the unlock policy.
    pub fn advance(&mut self, module_count: usize) {
        let last = module_count.saturating_sub(1);
        self.position = (self.position + 1).min(last);
    }

    /// Move to the previous module. Always permitted.
    pub fn rewind(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Clamp the position into the catalog range after a load; the catalog
    /// may have shrunk since the snapshot was written.
    pub fn clamp_position(&mut self, module_count: usize) {
        let last = module_count.saturating_sub(1);
        if self.position > last {
            self.position = last;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::PhaseId;
    use crate::model::module::Activity;
    use crate::time::fixed_now;

    fn module(id: u64) -> Module {
        let activity = Activity::new(
            "Q?",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            1,
            "",
        )
        .unwrap();
        Module::new(
            ModuleId::new(id),
            PhaseId::new('A').unwrap(),
            "M",
            "C",
            activity,
        )
    }

    #[test]
    fn first_correct_answer_completes_and_rewards() {
        let mut progress = Progress::new(fixed_now());
        let outcome = progress.submit_answer(&module(1), 1).unwrap();

        assert_eq!(outcome, AnswerOutcome::Completed { reward: 50 });
        assert!(progress.is_completed(ModuleId::new(1)));
        assert_eq!(progress.score, 50);
        assert_eq!(progress.streak, 1);
        assert_eq!(progress.best_streak, 1);
        assert_eq!(progress.answer_for(ModuleId::new(1)), Some(1));
    }

    #[test]
    fn repeat_correct_answer_is_idempotent() {
        let mut progress = Progress::new(fixed_now());
        progress.submit_answer(&module(1), 1).unwrap();
        let outcome = progress.submit_answer(&module(1), 1).unwrap();

        assert_eq!(outcome, AnswerOutcome::AlreadyCompleted);
        assert_eq!(progress.score, 50);
        assert_eq!(progress.streak, 1);
        assert_eq!(progress.completed.len(), 1);
    }

    #[test]
    fn wrong_answer_resets_streak_and_records_nothing() {
        let mut progress = Progress::new(fixed_now());
        progress.submit_answer(&module(1), 1).unwrap();
        assert_eq!(progress.streak, 1);

        let outcome = progress.submit_answer(&module(2), 0).unwrap();
        assert_eq!(outcome, AnswerOutcome::Incorrect);
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.best_streak, 1);
        assert_eq!(progress.score, 50);
        assert!(!progress.is_completed(ModuleId::new(2)));
        assert_eq!(progress.answer_for(ModuleId::new(2)), None);
    }

    #[test]
    fn streak_rebuilds_after_reset() {
        let mut progress = Progress::new(fixed_now());
        progress.submit_answer(&module(1), 1).unwrap();
        progress.submit_answer(&module(2), 0).unwrap();
        progress.submit_answer(&module(2), 1).unwrap();
        progress.submit_answer(&module(3), 1).unwrap();

        assert_eq!(progress.streak, 2);
        assert_eq!(progress.best_streak, 2);
        assert_eq!(progress.score, 150);
    }

    #[test]
    fn out_of_range_answer_is_rejected_without_mutation() {
        let mut progress = Progress::new(fixed_now());
        let err = progress.submit_answer(&module(1), 4).unwrap_err();
        assert_eq!(err, ProgressError::AnswerOutOfRange { index: 4, count: 4 });
        assert_eq!(progress, Progress::new(fixed_now()));
    }

    #[test]
    fn review_reward_is_repeatable() {
        let mut progress = Progress::new(fixed_now());
        progress.submit_answer(&module(1), 1).unwrap();
        progress.review_correct();
        progress.review_correct();

        assert_eq!(progress.score, 70);
        assert_eq!(progress.streak, 1);
    }

    #[test]
    fn advance_and_rewind_clamp_to_range() {
        let mut progress = Progress::new(fixed_now());
        progress.rewind();
        assert_eq!(progress.position, 0);

        progress.advance(3);
        progress.advance(3);
        progress.advance(3);
        assert_eq!(progress.position, 2);

        progress.rewind();
        assert_eq!(progress.position, 1);
    }

    #[test]
    fn clamp_position_handles_shrunken_catalog() {
        let mut progress = Progress::new(fixed_now());
        progress.position = 9;
        progress.clamp_position(3);
        assert_eq!(progress.position, 2);
    }

    #[test]
    fn deserializes_partial_snapshot_over_defaults() {
        let progress: Progress = serde_json::from_str(r#"{"position":2,"score":100}"#).unwrap();
        assert_eq!(progress.position, 2);
        assert_eq!(progress.score, 100);
        assert!(progress.completed.is_empty());
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.started_at, DateTime::UNIX_EPOCH);
    }
}
