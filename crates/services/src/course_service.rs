use std::sync::Arc;
use std::time::Duration;

use course_core::model::{
    AnswerOutcome, Catalog, Module, ModuleId, Progress,
};
use course_core::policy::{self, ModuleAccess};
use course_core::shuffle::ShuffledActivity;
use course_core::Clock;
use storage::repository::ProgressRepository;

use crate::autosave::Autosaver;
use crate::error::CourseError;
use crate::review_service::ReviewOutcome;

/// Orchestrates course progression over an injected catalog and repository.
///
/// The in-memory `Progress` owned here is the source of truth for the
/// session; every mutation schedules a debounced best-effort save of the
/// whole snapshot. All operations are synchronous except snapshot I/O,
/// which never blocks the interaction path.
pub struct CourseService {
    catalog: Arc<Catalog>,
    repo: Arc<dyn ProgressRepository>,
    clock: Clock,
    progress: Progress,
    autosaver: Autosaver,
}

impl CourseService {
    /// Build the service, resuming from the persisted snapshot when one
    /// exists. Any load failure (missing, corrupt, storage down) degrades
    /// to fresh defaults; nothing is surfaced to the caller.
    pub async fn load(
        catalog: Arc<Catalog>,
        repo: Arc<dyn ProgressRepository>,
        clock: Clock,
    ) -> Self {
        let progress = match repo.load().await {
            Ok(Some(mut progress)) => {
                progress.clamp_position(catalog.len());
                progress
            }
            Ok(None) => Progress::new(clock.now()),
            Err(err) => {
                tracing::warn!(%err, "failed to load progress snapshot, starting fresh");
                Progress::new(clock.now())
            }
        };

        let autosaver = Autosaver::new(Arc::clone(&repo));
        Self {
            catalog,
            repo,
            clock,
            progress,
            autosaver,
        }
    }

    #[must_use]
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosaver = Autosaver::new(Arc::clone(&self.repo)).with_delay(delay);
        self
    }

    // ─── Read accessors ────────────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.progress.position
    }

    #[must_use]
    pub fn current_module(&self) -> Option<&Module> {
        self.catalog.module_at(self.progress.position)
    }

    /// The current module's options in their seeded display order.
    #[must_use]
    pub fn shuffled_current(&self) -> Option<ShuffledActivity<'_>> {
        self.current_module()
            .map(|module| ShuffledActivity::for_module(module.activity(), module.id()))
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.progress.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.progress.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.progress.best_streak
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.completed.len()
    }

    #[must_use]
    pub fn is_course_complete(&self) -> bool {
        self.completed_count() == self.catalog.len()
    }

    #[must_use]
    pub fn module_access(&self, position: usize) -> Option<ModuleAccess> {
        policy::module_access(&self.catalog, &self.progress, position)
    }

    #[must_use]
    pub fn is_unlocked(&self, position: usize) -> bool {
        policy::is_unlocked(&self.catalog, &self.progress, position)
    }

    /// True once the current module is completed; the presentation layer
    /// must check this before calling `advance`.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        policy::can_advance(&self.catalog, &self.progress)
    }

    // ─── Mutations ─────────────────────────────────────────────────────────────

    /// Submit an answer for a module, in the canonical index space.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::UnknownModule` if the id is not in the catalog
    /// and `CourseError::Progress` if the index is out of range for the
    /// module's options.
    pub fn submit_answer(
        &mut self,
        module_id: ModuleId,
        canonical_index: usize,
    ) -> Result<AnswerOutcome, CourseError> {
        let module = self
            .catalog
            .get(module_id)
            .ok_or(CourseError::UnknownModule(module_id))?;
        let outcome = self.progress.submit_answer(module, canonical_index)?;
        self.autosaver.schedule(self.progress.clone());
        Ok(outcome)
    }

    /// Grade a review-mode answer for an already-completed module. Correct
    /// answers grant the small repeatable reward; streak and completion are
    /// untouched either way.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::UnknownModule` for ids outside the catalog,
    /// `CourseError::NotCompleted` for modules not yet completed, and
    /// `CourseError::Progress` for out-of-range indexes.
    pub fn review_answer(
        &mut self,
        module_id: ModuleId,
        canonical_index: usize,
    ) -> Result<ReviewOutcome, CourseError> {
        let module = self
            .catalog
            .get(module_id)
            .ok_or(CourseError::UnknownModule(module_id))?;
        if !self.progress.is_completed(module_id) {
            return Err(CourseError::NotCompleted(module_id));
        }

        let activity = module.activity();
        if canonical_index >= activity.options().len() {
            return Err(CourseError::Progress(
                course_core::model::ProgressError::AnswerOutOfRange {
                    index: canonical_index,
                    count: activity.options().len(),
                },
            ));
        }

        if !activity.is_correct(canonical_index) {
            return Ok(ReviewOutcome::Incorrect);
        }

        let reward = self.progress.review_correct();
        self.autosaver.schedule(self.progress.clone());
        Ok(ReviewOutcome::Correct { reward })
    }

    /// Move to the next module, clamped at the end of the catalog.
    ///
    /// Unconditional by contract: gating is the caller's job via
    /// `can_advance`.
    pub fn advance(&mut self) {
        self.progress.advance(self.catalog.len());
        self.autosaver.schedule(self.progress.clone());
    }

    /// Move to the previous module. Always permitted.
    pub fn rewind(&mut self) {
        self.progress.rewind();
        self.autosaver.schedule(self.progress.clone());
    }

    /// Jump directly to a module position.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::OutOfRange` for positions past the catalog and
    /// `CourseError::Locked` for modules the unlock policy still gates; no
    /// mutation happens in either case.
    pub fn jump_to(&mut self, position: usize) -> Result<(), CourseError> {
        if position >= self.catalog.len() {
            return Err(CourseError::OutOfRange { position });
        }
        if !self.is_unlocked(position) {
            return Err(CourseError::Locked { position });
        }

        self.progress.position = position;
        self.autosaver.schedule(self.progress.clone());
        Ok(())
    }

    /// Replace all progress with fresh defaults and persist immediately.
    pub async fn reset(&mut self) {
        self.progress = Progress::new(self.clock.now());
        self.autosaver.flush(&self.progress).await;
    }

    /// Write any pending snapshot now; call before shutdown.
    pub async fn flush(&mut self) {
        self.autosaver.flush(&self.progress).await;
    }
}
