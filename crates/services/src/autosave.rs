use std::sync::Arc;
use std::time::Duration;

use course_core::model::Progress;
use storage::repository::ProgressRepository;
use tokio::task::JoinHandle;

/// How long a burst of mutations may continue before the snapshot is
/// written. Each new mutation restarts the timer, collapsing rapid state
/// changes into a single write.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(300);

/// Debounced, fire-and-forget persistence of the progress snapshot.
///
/// Write failures are logged and swallowed: the in-memory `Progress` stays
/// authoritative for the session and the worst case is that progress does
/// not survive a reload.
pub struct Autosaver {
    repo: Arc<dyn ProgressRepository>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Autosaver {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            delay: DEFAULT_AUTOSAVE_DELAY,
            pending: None,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Schedule a write of the snapshot after the debounce delay, replacing
    /// any write still pending.
    pub fn schedule(&mut self, snapshot: Progress) {
        self.cancel();
        let repo = Arc::clone(&self.repo);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = repo.save(&snapshot).await {
                tracing::warn!(%err, "progress autosave failed");
            }
        }));
    }

    /// Cancel any pending write without performing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Cancel the timer and write the given snapshot now. Still best-effort.
    pub async fn flush(&mut self, snapshot: &Progress) {
        self.cancel();
        if let Err(err) = self.repo.save(snapshot).await {
            tracing::warn!(%err, "progress save failed");
        }
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, StorageError};

    struct FailingRepository;

    #[async_trait::async_trait]
    impl ProgressRepository for FailingRepository {
        async fn load(&self) -> Result<Option<Progress>, StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }

        async fn save(&self, _progress: &Progress) -> Result<(), StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }

        async fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }
    }

    #[tokio::test]
    async fn coalesces_rapid_schedules_into_one_write() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut saver = Autosaver::new(repo.clone()).with_delay(Duration::from_millis(20));

        let mut progress = Progress::new(fixed_now());
        for score in [10, 20, 30] {
            progress.score = score;
            saver.schedule(progress.clone());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().await.unwrap().unwrap().score, 30);
    }

    #[tokio::test]
    async fn cancel_discards_the_pending_write() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut saver = Autosaver::new(repo.clone()).with_delay(Duration::from_millis(20));

        saver.schedule(Progress::new(fixed_now()));
        saver.cancel();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn save_failures_are_swallowed() {
        let mut saver =
            Autosaver::new(Arc::new(FailingRepository)).with_delay(Duration::from_millis(10));

        let progress = Progress::new(fixed_now());
        saver.schedule(progress.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        saver.flush(&progress).await;
    }

    #[tokio::test]
    async fn flush_writes_immediately() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut saver = Autosaver::new(repo.clone()).with_delay(Duration::from_secs(60));

        let mut progress = Progress::new(fixed_now());
        progress.score = 50;
        saver.schedule(progress.clone());
        saver.flush(&progress).await;

        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().await.unwrap().unwrap().score, 50);
    }
}
