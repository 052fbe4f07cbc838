use course_core::model::{Catalog, ModuleId, Progress};
use rand::Rng;
use rand::seq::IteratorRandom;

/// Result of grading a review-mode answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Correct; the small repeatable reward was granted.
    Correct { reward: u32 },
    /// Wrong pick; nothing changes.
    Incorrect,
}

/// Review mode: re-quizzes modules the user has already completed. Rewards
/// are small and repeatable and never gate progression.
pub struct ReviewService;

impl ReviewService {
    /// Pick a uniformly random completed module, or `None` when nothing has
    /// been completed yet.
    #[must_use]
    pub fn pick_module(catalog: &Catalog, progress: &Progress) -> Option<ModuleId> {
        Self::pick_module_with(catalog, progress, &mut rand::rng())
    }

    /// Deterministic variant for callers that supply their own generator.
    pub fn pick_module_with<R: Rng + ?Sized>(
        catalog: &Catalog,
        progress: &Progress,
        rng: &mut R,
    ) -> Option<ModuleId> {
        progress
            .completed
            .iter()
            .copied()
            .filter(|id| catalog.get(*id).is_some())
            .choose(rng)
    }
}
