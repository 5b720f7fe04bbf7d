use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AdminApi, AdminService, ApiError, AppServices, AppSettingsService, AttemptService, AuthApi,
    AuthContext, AuthoringService, Backend, CatalogApi, CatalogService, QuizApi, ResultsService,
    TokenSlot,
};
use storage::repository::Storage;
use study_core::model::{
    AppSettings, AttemptSubmission, AuthSession, Chapter, ChapterId, Credentials, NewPdf,
    NewVideo, Pdf, PdfId, Question, QuestionDraft, Quiz, QuizId, QuizResult, QuizSummary,
    ResultRecord, Role, Subject, SubjectId, Topic, TopicId, User, UserId, ValidQuizDraft, Video,
};

use crate::context::{CurrentUser, UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::quiz::QuizTestHandles;
use crate::views::{
    AdminView, CreateQuizView, HistoryView, HomeView, LoginView, QuizView, SettingsView,
    SubjectView, TopicView,
};

#[derive(Default)]
pub struct FakeBackend {
    pub subjects: Mutex<Vec<Subject>>,
    pub chapters: Mutex<Vec<Chapter>>,
    pub quizzes: Mutex<Vec<Quiz>>,
    pub submissions: Mutex<Vec<AttemptSubmission>>,
    pub results: Mutex<Vec<ResultRecord>>,
    pub videos: Mutex<Vec<Video>>,
    pub users: Mutex<Vec<User>>,
    /// Every catalog call fails with this message when set.
    pub catalog_down: Mutex<Option<String>>,
}

pub fn user(id: &str, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: format!("User {id}"),
        email: (role != Role::Student).then(|| format!("{id}@institute.test")),
        mobile: (role == Role::Student).then(|| "9000000000".to_string()),
        role,
        batch_code: (role == Role::Student).then(|| "NEET25".to_string()),
    }
}

pub fn quiz(id: &str, questions: usize, time_limit_mins: u32) -> Quiz {
    let questions = (0..questions)
        .map(|i| {
            Question::new(
                i,
                format!("Question {i}"),
                vec!["Red".into(), "Green".into(), "Blue".into(), "Black".into()],
                None,
            )
            .unwrap()
        })
        .collect();
    Quiz::new(
        QuizId::new(id),
        SubjectId::new("physics"),
        "Optics",
        None,
        questions,
        time_limit_mins,
    )
    .unwrap()
}

impl FakeBackend {
    fn catalog_check(&self) -> Result<(), ApiError> {
        match self.catalog_down.lock().unwrap().clone() {
            Some(message) => Err(ApiError::InvalidPayload(message)),
            None => Ok(()),
        }
    }

    fn backend(self: &Arc<Self>) -> Backend {
        Backend {
            auth: self.clone(),
            quizzes: self.clone(),
            catalog: self.clone(),
            admin: self.clone(),
            token: TokenSlot::new(),
        }
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let id = match credentials.role() {
            Role::Admin => "admin_1",
            Role::Teacher => "teacher_1",
            Role::Student => "student_1",
        };
        Ok(AuthSession::new(
            format!("session_{id}"),
            user(id, credentials.role()),
        ))
    }

    async fn me(&self) -> Result<User, ApiError> {
        Err(ApiError::Unauthorized { detail: None })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[async_trait]
impl QuizApi for FakeBackend {
    async fn fetch_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError> {
        self.quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|quiz| quiz.id() == id)
            .cloned()
            .ok_or_else(|| ApiError::InvalidPayload(format!("no quiz {id}")))
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<QuizResult, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        let answered = submission.answers.iter().filter(|a| **a >= 0).count();
        Ok(QuizResult::new(
            u32::try_from(answered).unwrap(),
            u32::try_from(submission.answers.len()).unwrap(),
        ))
    }

    async fn list_quizzes(&self, subject_id: &SubjectId) -> Result<Vec<QuizSummary>, ApiError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .filter(|quiz| quiz.subject_id() == subject_id)
            .map(|quiz| QuizSummary {
                id: quiz.id().clone(),
                subject_id: quiz.subject_id().clone(),
                title: quiz.title().to_string(),
                question_count: quiz.question_count(),
                time_limit_mins: quiz.time_limit_mins(),
            })
            .collect())
    }

    async fn create_quiz(&self, draft: &ValidQuizDraft) -> Result<QuizSummary, ApiError> {
        Ok(QuizSummary {
            id: QuizId::new("created"),
            subject_id: draft.subject_id().clone(),
            title: draft.title().to_string(),
            question_count: draft.questions().len(),
            time_limit_mins: draft.time_limit_mins(),
        })
    }

    async fn generate_questions(
        &self,
        _subject_id: &SubjectId,
        _topic: &str,
        _count: u32,
    ) -> Result<Vec<QuestionDraft>, ApiError> {
        Ok(Vec::new())
    }

    async fn results(&self, _student_id: &UserId) -> Result<Vec<ResultRecord>, ApiError> {
        Ok(self.results.lock().unwrap().clone())
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.catalog_check()?;
        Ok(self.subjects.lock().unwrap().clone())
    }

    async fn chapters(&self, subject_id: &SubjectId) -> Result<Vec<Chapter>, ApiError> {
        self.catalog_check()?;
        Ok(self
            .chapters
            .lock()
            .unwrap()
            .iter()
            .filter(|chapter| &chapter.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn topics(&self, _chapter_id: &ChapterId) -> Result<Vec<Topic>, ApiError> {
        self.catalog_check()?;
        Ok(Vec::new())
    }

    async fn videos(&self, topic_id: &TopicId) -> Result<Vec<Video>, ApiError> {
        self.catalog_check()?;
        Ok(self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|video| &video.topic_id == topic_id)
            .cloned()
            .collect())
    }

    async fn pdfs(&self, _topic_id: &TopicId) -> Result<Vec<Pdf>, ApiError> {
        self.catalog_check()?;
        Ok(Vec::new())
    }

    async fn pdf_bytes(&self, _id: &PdfId) -> Result<Vec<u8>, ApiError> {
        Ok(b"%PDF-1.4".to_vec())
    }

    async fn add_video(&self, _video: &NewVideo) -> Result<Video, ApiError> {
        Err(ApiError::InvalidPayload("uploads are not faked".into()))
    }

    async fn add_pdf(&self, _pdf: &NewPdf) -> Result<Pdf, ApiError> {
        Err(ApiError::InvalidPayload("uploads are not faked".into()))
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn reset_password(&self, _user_id: &UserId, _new_password: &str) -> Result<(), ApiError> {
        Ok(())
    }
}


struct NoopOpener;

impl UiLinkOpener for NoopOpener {
    fn open_url(&self, _url: &str) {}

    fn open_path(&self, _path: &Path) {}
}

struct TestApp {
    services: AppServices,
    opener: LinkOpenerRef,
}

impl UiApp for TestApp {
    fn settings(&self) -> AppSettings {
        self.services.settings().clone()
    }

    fn auth(&self) -> Arc<AuthContext> {
        self.services.auth()
    }

    fn attempts(&self) -> Arc<AttemptService> {
        self.services.attempts()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        self.services.authoring()
    }

    fn results(&self) -> Arc<ResultsService> {
        self.services.results()
    }

    fn admin(&self) -> Arc<AdminService> {
        self.services.admin()
    }

    fn app_settings(&self) -> Arc<AppSettingsService> {
        self.services.app_settings()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.opener)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Subject(String),
    Topic(String),
    Quiz(String),
    History,
    Admin,
    CreateQuiz(String),
    Settings,
    Login,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    user: Option<User>,
    quiz_handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| CurrentUser(Signal::new(props.user.clone())));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.quiz_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Subject(subject_id) => rsx! { SubjectView { subject_id } },
        ViewKind::Topic(topic_id) => rsx! { TopicView { topic_id } },
        ViewKind::Quiz(quiz_id) => rsx! { QuizView { quiz_id } },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Admin => rsx! { AdminView {} },
        ViewKind::CreateQuiz(subject_id) => rsx! { CreateQuizView { subject_id } },
        ViewKind::Settings => rsx! { SettingsView {} },
        ViewKind::Login => rsx! { LoginView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: Arc<FakeBackend>,
    pub quiz_handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned work (loads, the attempt runner) catch up.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn cache_dir() -> PathBuf {
    std::env::temp_dir().join("study-ui-view-tests")
}

/// Build a harness for `view`, signing in as `role` first when given.
pub async fn setup_view_harness(
    view: ViewKind,
    role: Option<Role>,
    backend: Arc<FakeBackend>,
) -> ViewHarness {
    let services = AppServices::from_parts(
        Storage::in_memory(),
        backend.backend(),
        AppSettings::default(),
        cache_dir(),
    );

    let user = match role {
        Some(Role::Student) => Some(
            services
                .auth()
                .login(Credentials::Student {
                    mobile: "9000000000".into(),
                    batch_code: "NEET25".into(),
                })
                .await
                .expect("student login"),
        ),
        Some(Role::Teacher) => Some(
            services
                .auth()
                .login(Credentials::Teacher {
                    email: "teacher_1@institute.test".into(),
                    password: "secret".into(),
                })
                .await
                .expect("teacher login"),
        ),
        Some(Role::Admin) => Some(
            services
                .auth()
                .login(Credentials::Admin {
                    email: "admin_1@institute.test".into(),
                    password: "secret".into(),
                })
                .await
                .expect("admin login"),
        ),
        None => None,
    };

    let app = Arc::new(TestApp {
        services,
        opener: Arc::new(NoopOpener),
    });
    let quiz_handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            user,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        quiz_handles,
    }
}
