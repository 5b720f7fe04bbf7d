use storage::repository::{AppSettingsRepository, AuthSessionRepository, Storage};
use storage::sqlite::SqliteRepository;
use study_core::model::{AppSettingsDraft, AuthSession, Role, User, UserId};

fn student_session(token: &str) -> AuthSession {
    AuthSession::new(
        token,
        User {
            id: UserId::new("stu_42"),
            name: "Meera".into(),
            email: None,
            mobile: Some("9000000001".into()),
            role: Role::Student,
            batch_code: Some("JEE-A".into()),
        },
    )
}

#[tokio::test]
async fn sqlite_session_survives_reconnect_and_clears() {
    let url = "sqlite:file:memdb_session?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_session().await.unwrap().is_none());
    repo.save_session(&student_session("tok-a")).await.unwrap();

    // A second pool on the same shared in-memory database sees the row,
    // standing in for an app restart.
    let reopened = Storage::sqlite(url).await.expect("reopen");
    let loaded = reopened
        .auth_sessions
        .load_session()
        .await
        .unwrap()
        .expect("session persisted");
    assert_eq!(loaded.token(), "tok-a");
    assert_eq!(loaded.user().role, Role::Student);
    assert_eq!(loaded.user().batch_code.as_deref(), Some("JEE-A"));
    assert_eq!(loaded.user().email, None);

    reopened.auth_sessions.clear_session().await.unwrap();
    assert!(repo.load_session().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_session_save_replaces_previous() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_session(&student_session("first")).await.unwrap();
    repo.save_session(&student_session("second")).await.unwrap();

    let loaded = repo.load_session().await.unwrap().unwrap();
    assert_eq!(loaded.token(), "second");
}

#[tokio::test]
async fn sqlite_settings_round_trip() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_settings?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Migrations are idempotent.
    repo.migrate().await.expect("migrate twice");

    assert!(repo.get_settings().await.unwrap().is_none());

    let settings = AppSettingsDraft {
        api_base_url: Some("https://coach.example.org/api/".into()),
        history_student_id: Some("stu_42".into()),
    }
    .validate()
    .unwrap();
    repo.save_settings(&settings).await.unwrap();

    let loaded = repo.get_settings().await.unwrap().unwrap();
    assert_eq!(loaded.api_base_url(), Some("https://coach.example.org/api"));
    assert_eq!(
        loaded.history_student_id().map(UserId::as_str),
        Some("stu_42")
    );
}
