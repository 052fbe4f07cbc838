use std::sync::Arc;
use std::time::Duration;

use course_core::model::{
    Activity, AnswerOutcome, Catalog, Module, ModuleId, Phase, PhaseId,
};
use course_core::policy::ModuleAccess;
use course_core::time::fixed_clock;
use services::{Clock, CourseError, CourseService, ReviewOutcome};
use course_core::model::Progress;
use storage::repository::{InMemoryRepository, ProgressRepository, StorageError};

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

fn build_catalog() -> Arc<Catalog> {
    let phase = Phase::new(PhaseId::new('A').unwrap(), "Foundations");
    let modules = (1..=3)
        .map(|id| {
            let activity = Activity::new(
                format!("Question {id}?"),
                vec![
                    "wrong one".into(),
                    "right one".into(),
                    "wrong two".into(),
                    "wrong three".into(),
                ],
                1,
                "the second option is correct",
            )
            .unwrap();
            Module::new(
                ModuleId::new(id),
                PhaseId::new('A').unwrap(),
                format!("Module {id}"),
                "Concept",
                activity,
            )
        })
        .collect();
    Arc::new(Catalog::new(vec![phase], modules).unwrap())
}

async fn fresh_service(repo: Arc<InMemoryRepository>) -> CourseService {
    CourseService::load(build_catalog(), repo, fixed_clock())
        .await
        .with_autosave_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn completing_a_module_unlocks_the_next() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    assert_eq!(service.module_access(0), Some(ModuleAccess::Unlocked));
    assert_eq!(service.module_access(1), Some(ModuleAccess::Locked));
    assert!(!service.can_advance());

    let outcome = service.submit_answer(ModuleId::new(1), 1).unwrap();
    assert_eq!(outcome, AnswerOutcome::Completed { reward: 50 });
    assert_eq!(service.score(), 50);
    assert_eq!(service.streak(), 1);
    assert_eq!(service.best_streak(), 1);
    assert_eq!(service.module_access(0), Some(ModuleAccess::Completed));
    assert_eq!(service.module_access(1), Some(ModuleAccess::Unlocked));
    assert!(service.can_advance());
}

#[tokio::test]
async fn repeat_correct_answer_changes_nothing() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    let outcome = service.submit_answer(ModuleId::new(1), 1).unwrap();

    assert_eq!(outcome, AnswerOutcome::AlreadyCompleted);
    assert_eq!(service.score(), 50);
    assert_eq!(service.streak(), 1);
    assert_eq!(service.completed_count(), 1);
}

#[tokio::test]
async fn locked_and_out_of_range_jumps_are_rejected_without_moving() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    assert_eq!(
        service.jump_to(2),
        Err(CourseError::Locked { position: 2 })
    );
    assert_eq!(
        service.jump_to(9),
        Err(CourseError::OutOfRange { position: 9 })
    );
    assert_eq!(service.position(), 0);

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.jump_to(1).unwrap();
    assert_eq!(service.position(), 1);
}

#[tokio::test]
async fn wrong_answer_resets_streak_only() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.advance();
    let outcome = service.submit_answer(ModuleId::new(2), 0).unwrap();

    assert_eq!(outcome, AnswerOutcome::Incorrect);
    assert_eq!(service.streak(), 0);
    assert_eq!(service.best_streak(), 1);
    assert_eq!(service.score(), 50);
    assert_eq!(service.completed_count(), 1);
}

#[tokio::test]
async fn navigation_clamps_at_both_ends() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    service.rewind();
    assert_eq!(service.position(), 0);

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.advance();
    service.submit_answer(ModuleId::new(2), 1).unwrap();
    service.advance();
    service.advance();
    assert_eq!(service.position(), 2);
}

#[tokio::test]
async fn review_reward_is_small_and_repeatable() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    assert_eq!(
        service.review_answer(ModuleId::new(1), 1),
        Err(CourseError::NotCompleted(ModuleId::new(1)))
    );

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    assert_eq!(
        service.review_answer(ModuleId::new(1), 1).unwrap(),
        ReviewOutcome::Correct { reward: 10 }
    );
    assert_eq!(
        service.review_answer(ModuleId::new(1), 0).unwrap(),
        ReviewOutcome::Incorrect
    );
    assert_eq!(
        service.review_answer(ModuleId::new(1), 1).unwrap(),
        ReviewOutcome::Correct { reward: 10 }
    );

    assert_eq!(service.score(), 70);
    assert_eq!(service.streak(), 1);
}

#[tokio::test]
async fn reset_restores_documented_defaults_and_persists() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo.clone()).await;

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.advance();
    service.reset().await;

    assert_eq!(service.position(), 0);
    assert_eq!(service.score(), 0);
    assert_eq!(service.streak(), 0);
    assert_eq!(service.best_streak(), 0);
    assert_eq!(service.completed_count(), 0);
    assert!(service.progress().answers.is_empty());

    let persisted = repo.load().await.unwrap().expect("reset persists");
    assert_eq!(persisted.score, 0);
}

#[tokio::test]
async fn progress_survives_a_restart() {
    let repo = Arc::new(InMemoryRepository::new());

    let mut service = fresh_service(repo.clone()).await;
    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.advance();
    service.flush().await;
    drop(service);

    let resumed = fresh_service(repo).await;
    assert_eq!(resumed.position(), 1);
    assert_eq!(resumed.score(), 50);
    assert!(resumed.progress().is_completed(ModuleId::new(1)));
    assert_eq!(resumed.module_access(1), Some(ModuleAccess::Unlocked));
}

#[tokio::test]
async fn load_degrades_to_defaults_when_snapshot_is_missing() {
    let repo = Arc::new(InMemoryRepository::new());
    let service = fresh_service(repo).await;

    assert_eq!(service.position(), 0);
    assert_eq!(service.score(), 0);
    assert!(!service.is_course_complete());
}

#[tokio::test]
async fn load_degrades_to_defaults_when_storage_is_down() {
    let repo = Arc::new(FailingRepository);
    let service = CourseService::load(build_catalog(), repo, fixed_clock()).await;

    assert_eq!(service.position(), 0);
    assert_eq!(service.score(), 0);
    assert_eq!(service.completed_count(), 0);
    assert_eq!(service.progress().started_at, course_core::time::fixed_now());
}

#[tokio::test]
async fn write_failures_leave_in_memory_state_authoritative() {
    let repo = Arc::new(FailingRepository);
    let mut service = CourseService::load(build_catalog(), repo, fixed_clock())
        .await
        .with_autosave_delay(Duration::from_millis(10));

    service.submit_answer(ModuleId::new(1), 1).unwrap();
    service.advance();
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.flush().await;

    assert_eq!(service.score(), 50);
    assert_eq!(service.position(), 1);
    assert!(service.progress().is_completed(ModuleId::new(1)));
}

#[tokio::test]
async fn load_clamps_position_into_catalog_range() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut oversized = Progress::new(course_core::time::fixed_now());
    oversized.position = 99;
    repo.save(&oversized).await.unwrap();

    let service = CourseService::load(build_catalog(), repo, Clock::default_clock()).await;
    assert_eq!(service.position(), 2);
}

#[tokio::test]
async fn rapid_mutations_produce_a_single_debounced_write() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo.clone()).await;

    service.submit_answer(ModuleId::new(1), 0).unwrap();
    service.submit_answer(ModuleId::new(1), 2).unwrap();
    service.submit_answer(ModuleId::new(1), 1).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(repo.save_count(), 1);
    let persisted = repo.load().await.unwrap().unwrap();
    assert_eq!(persisted.score, 50);
}

#[tokio::test]
async fn shuffled_options_round_trip_to_canonical_space() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut service = fresh_service(repo).await;

    let (module_id, correct_display) = {
        let shuffled = service.shuffled_current().expect("module present");
        let module = service.current_module().unwrap();
        assert_eq!(
            shuffled.options()[shuffled.correct_display()],
            module.activity().options()[module.activity().correct_index()]
        );
        (module.id(), shuffled.correct_display())
    };

    let canonical = {
        let shuffled = service.shuffled_current().unwrap();
        shuffled.canonical_of(correct_display).unwrap()
    };
    let outcome = service.submit_answer(module_id, canonical).unwrap();
    assert_eq!(outcome, AnswerOutcome::Completed { reward: 50 });
}
