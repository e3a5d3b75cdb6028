use std::sync::Arc;

use storage::repository::{EntryRepository, InMemoryRepository, StorageError};
use study_core::model::{LevelId, NerveType, StudyEntry};

use super::test_harness::setup_study_harness;
use crate::vm::Intent;

fn entries_with_roles() -> Vec<StudyEntry> {
    vec![
        StudyEntry::new("CN I", NerveType::Sensory, "Smell", "none", 1).unwrap(),
        StudyEntry::new("CN XII", NerveType::Motor, "Tongue movement", "Bolus control", 12)
            .unwrap(),
    ]
}

fn entries_without_roles() -> Vec<StudyEntry> {
    vec![
        StudyEntry::new("CN I", NerveType::Sensory, "Smell", "", 1).unwrap(),
        StudyEntry::new("CN II", NerveType::Sensory, "Vision", "None", 2).unwrap(),
    ]
}

fn repo(entries: Vec<StudyEntry>) -> Arc<dyn EntryRepository> {
    Arc::new(InMemoryRepository::new(entries))
}

struct FailingEntryRepo;

#[async_trait::async_trait]
impl EntryRepository for FailingEntryRepo {
    async fn load_entries(&self) -> Result<Vec<StudyEntry>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_renders_level_select() {
    let harness = setup_study_harness(repo(entries_with_roles())).await;
    let html = harness.render();
    assert!(html.contains("Choose Your Level"), "missing title in {html}");
    assert!(html.contains("Level 3"), "missing level button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_renders_load_failure() {
    let harness = setup_study_harness(Arc::new(FailingEntryRepo)).await;
    let html = harness.render();
    assert!(html.contains("Unable to Load CSV"), "missing error title in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_renders_empty_store() {
    let harness = setup_study_harness(repo(Vec::new())).await;
    let html = harness.render();
    assert!(html.contains("No Entries Found"), "missing empty title in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_walks_into_level1_question() {
    let mut harness = setup_study_harness(repo(entries_with_roles())).await;

    harness.dispatch(Intent::SelectLevel(LevelId::Level1));
    let html = harness.render();
    assert!(html.contains("Multiple Choice"), "missing level subtitle in {html}");
    assert!(html.contains("Start"), "missing start in {html}");

    harness.dispatch(Intent::Start);
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Match the Function"), "missing question title in {html}");
    assert!(html.contains("Question 1 of 2"), "missing counter in {html}");
    assert!(html.contains("Both"), "missing type option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_flashcards_reach_summary() {
    let mut harness = setup_study_harness(repo(entries_with_roles())).await;
    harness.dispatch(Intent::SelectLevel(LevelId::Level2));
    harness.dispatch(Intent::Start);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Card 1 of 2"), "missing counter in {html}");
    assert!(
        html.contains("Click the card to unlock scoring."),
        "missing hint in {html}"
    );

    harness.dispatch(Intent::Flip);
    let html = harness.render();
    assert!(html.contains("Function"), "missing back face in {html}");

    harness.dispatch(Intent::Score { is_correct: false });
    harness.dispatch(Intent::Flip);
    harness.dispatch(Intent::Score { is_correct: true });
    let html = harness.render();
    assert!(html.contains("Level 2 Complete"), "missing summary in {html}");
    assert!(html.contains("Retry Failed"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_level3_unavailable() {
    let mut harness = setup_study_harness(repo(entries_without_roles())).await;
    harness.dispatch(Intent::SelectLevel(LevelId::Level3));
    harness.dispatch(Intent::Start);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Swallowing Roles Missing"), "missing title in {html}");
    assert!(
        html.contains("no swallowing role entries found"),
        "missing reason in {html}"
    );

    harness.dispatch(Intent::Back);
    let html = harness.render();
    assert!(html.contains("Choose Your Level"), "missing level select in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_shows_rejection_banner() {
    let mut harness = setup_study_harness(repo(entries_with_roles())).await;
    harness.dispatch(Intent::Submit);
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing banner in {html}");

    harness.dispatch(Intent::SelectLevel(LevelId::Level1));
    let html = harness.render();
    assert!(!html.contains("Something went wrong"), "stale banner in {html}");
}
