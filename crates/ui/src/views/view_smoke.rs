use std::sync::Arc;

use chrono::Duration;
use services::AttemptCommand;
use study_core::model::{
    AttemptPhase, Chapter, ChapterId, QuizId, QuizResult, ResultRecord, Role, Subject, SubjectId,
};
use study_core::time::fixed_now;

use super::test_harness::{FakeBackend, ViewKind, quiz, setup_view_harness, user};

fn physics() -> Subject {
    Subject {
        id: SubjectId::new("physics"),
        name: "Physics".into(),
        teacher_name: "Jatin".into(),
        description: "Mechanics and more".into(),
        icon: "atom".into(),
        color: "#FF6B6B".into(),
    }
}

fn backend_with_quiz() -> Arc<FakeBackend> {
    let backend = FakeBackend::default();
    backend.quizzes.lock().unwrap().push(quiz("q1", 2, 1));
    Arc::new(backend)
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_subject_cards() {
    let backend = Arc::new(FakeBackend::default());
    backend.subjects.lock().unwrap().push(physics());
    let mut harness = setup_view_harness(ViewKind::Home, Some(Role::Student), backend).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Physics"), "missing subject in {html}");
    assert!(html.contains("Jatin"), "missing teacher in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_shows_friendly_error_when_catalog_fails() {
    let backend = Arc::new(FakeBackend::default());
    *backend.catalog_down.lock().unwrap() = Some("boom".into());
    let mut harness = setup_view_harness(ViewKind::Home, Some(Role::Student), backend).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Something went wrong. Please try again."),
        "missing error in {html}"
    );
    assert!(!html.contains("boom"), "raw error leaked into {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn subject_view_smoke_lists_chapters_and_quizzes() {
    let backend = backend_with_quiz();
    backend.chapters.lock().unwrap().push(Chapter {
        id: ChapterId::new("c1"),
        subject_id: SubjectId::new("physics"),
        name: "Ray optics".into(),
        number: 9,
        description: None,
    });
    let mut harness = setup_view_harness(
        ViewKind::Subject("physics".into()),
        Some(Role::Teacher),
        backend,
    )
    .await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Chapter 9: Ray optics"), "missing chapter in {html}");
    assert!(html.contains("Optics"), "missing quiz in {html}");
    assert!(html.contains("2 questions · 1 min"), "missing quiz meta in {html}");
    assert!(html.contains("Create quiz"), "teacher should see authoring link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_hides_uploads_from_students() {
    let mut harness = setup_view_harness(
        ViewKind::Topic("t1".into()),
        Some(Role::Student),
        Arc::new(FakeBackend::default()),
    )
    .await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No videos yet."), "missing empty state in {html}");
    assert!(html.contains("No PDFs yet."), "missing empty state in {html}");
    assert!(!html.contains("Add video"), "student sees upload in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_result_rows() {
    let backend = Arc::new(FakeBackend::default());
    backend.results.lock().unwrap().push(ResultRecord {
        quiz_id: QuizId::new("q1"),
        quiz_title: "Optics weekly test".into(),
        result: QuizResult::new(7, 10),
        completed_at: fixed_now() - Duration::hours(1),
    });
    let mut harness = setup_view_harness(ViewKind::History, Some(Role::Student), backend).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Optics weekly test"), "missing title in {html}");
    assert!(html.contains("7 / 10"), "missing score in {html}");
    assert!(html.contains("70%"), "missing percentage in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_waits_for_start() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("q1".into()), Some(Role::Student), backend_with_quiz())
            .await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Start quiz"), "missing start button in {html}");
    assert!(html.contains("2 questions"), "missing intro in {html}");
    assert!(!html.contains("Question 0"), "questions shown before start in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_runs_an_attempt_to_the_result() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("q1".into()), Some(Role::Student), backend_with_quiz())
            .await;
    harness.rebuild();
    harness.settle().await;

    harness.quiz_handles.send(AttemptCommand::Start);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 0"), "missing question in {html}");
    assert!(html.contains("0 of 2 answered"), "missing progress in {html}");

    harness.quiz_handles.send(AttemptCommand::Select {
        question: 0,
        option: 1,
    });
    harness.quiz_handles.send(AttemptCommand::Select {
        question: 1,
        option: 2,
    });
    harness.settle().await;
    assert!(harness.render().contains("2 of 2 answered"));

    harness.quiz_handles.send(AttemptCommand::Submit);
    harness.settle().await;

    let snapshot = harness.quiz_handles.snapshot().expect("attempt running");
    assert_eq!(snapshot.state.phase(), AttemptPhase::Submitted);
    let html = harness.render();
    assert!(html.contains("Your score"), "missing result in {html}");
    assert!(html.contains("2 / 2"), "missing score in {html}");

    let submissions = harness.backend.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].answers, vec![1, 2]);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_asks_before_submitting_blank_answers() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("q1".into()), Some(Role::Student), backend_with_quiz())
            .await;
    harness.rebuild();
    harness.settle().await;

    harness.quiz_handles.send(AttemptCommand::Start);
    harness.quiz_handles.send(AttemptCommand::Select {
        question: 0,
        option: 0,
    });
    harness.quiz_handles.send(AttemptCommand::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("1 question is still unanswered. Submit anyway?"),
        "missing confirmation in {html}"
    );
    assert!(harness.backend.submissions.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_missing_quiz() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("gone".into()),
        Some(Role::Student),
        backend_with_quiz(),
    )
    .await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Could not open quiz"), "missing dialog in {html}");
    assert!(html.contains("Go back"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn create_quiz_view_smoke_blocks_students() {
    let mut harness = setup_view_harness(
        ViewKind::CreateQuiz("physics".into()),
        Some(Role::Student),
        Arc::new(FakeBackend::default()),
    )
    .await;

    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Your account cannot open this page."),
        "missing guard in {html}"
    );
    assert!(!html.contains("Publish quiz"));
}

#[tokio::test(flavor = "current_thread")]
async fn create_quiz_view_smoke_opens_editor_for_teachers() {
    let mut harness = setup_view_harness(
        ViewKind::CreateQuiz("physics".into()),
        Some(Role::Teacher),
        Arc::new(FakeBackend::default()),
    )
    .await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("New quiz"), "missing heading in {html}");
    assert!(html.contains("Question 1"), "missing starter question in {html}");
    assert!(html.contains("Generate with AI"));
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_lists_users() {
    let backend = Arc::new(FakeBackend::default());
    backend
        .users
        .lock()
        .unwrap()
        .extend([user("s1", Role::Student), user("t1", Role::Teacher)]);
    let mut harness = setup_view_harness(ViewKind::Admin, Some(Role::Admin), backend).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("User s1"), "missing student in {html}");
    assert!(html.contains("t1@institute.test"), "missing contact in {html}");
    assert!(html.contains("Reset password"));
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_defaults_to_student_fields() {
    let mut harness =
        setup_view_harness(ViewKind::Login, None, Arc::new(FakeBackend::default())).await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Mobile number"), "missing mobile field in {html}");
    assert!(html.contains("Batch code"), "missing batch field in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_smoke_shows_active_server() {
    let mut harness =
        setup_view_harness(ViewKind::Settings, None, Arc::new(FakeBackend::default())).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Connected to http://localhost:8001/api"),
        "missing server in {html}"
    );
}
