#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use services::{AdminApi, ApiError, AppServices, AuthApi, Backend, CatalogApi, QuizApi, TokenSlot};
use storage::repository::Storage;
use study_core::model::{
    AppSettings, AttemptSubmission, AuthSession, Chapter, ChapterId, Credentials, NewPdf,
    NewVideo, Pdf, PdfId, Question, QuestionDraft, Quiz, QuizId, QuizResult, QuizSummary,
    ResultRecord, Role, Subject, SubjectId, Topic, TopicId, User, UserId, ValidQuizDraft, Video,
    VideoId, VideoSource,
};
use study_core::time::fixed_now;

/// In-process stand-in for the REST backend. Records what the client sent.
#[derive(Default)]
pub struct FakeBackend {
    pub quizzes: Mutex<Vec<Quiz>>,
    pub submissions: Mutex<Vec<AttemptSubmission>>,
    /// Queued failures for the next submissions; empty means succeed.
    pub submit_failures: Mutex<VecDeque<ApiError>>,
    pub created: Mutex<Vec<ValidQuizDraft>>,
    pub generated: Mutex<Vec<QuestionDraft>>,
    pub results: Mutex<Vec<ResultRecord>>,
    pub results_requested_for: Mutex<Vec<UserId>>,
    pub chapters: Mutex<Vec<Chapter>>,
    pub pdf_bytes: Mutex<Vec<u8>>,
    pub videos_added: Mutex<Vec<NewVideo>>,
    pub users: Mutex<Vec<User>>,
    pub password_resets: Mutex<Vec<(UserId, String)>>,
}

pub fn user(id: &str, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: format!("User {id}"),
        email: (role != Role::Student).then(|| format!("{id}@institute.test")),
        mobile: (role == Role::Student).then(|| "9000000000".to_string()),
        role,
        batch_code: None,
    }
}

pub fn quiz(id: &str, questions: usize, time_limit_mins: u32) -> Quiz {
    let questions = (0..questions)
        .map(|i| {
            Question::new(
                i,
                format!("Question {i}"),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                None,
            )
            .unwrap()
        })
        .collect();
    Quiz::new(
        QuizId::new(id),
        SubjectId::new("physics"),
        "Kinematics",
        None,
        questions,
        time_limit_mins,
    )
    .unwrap()
}

impl FakeBackend {
    pub fn with_quiz(quiz: Quiz) -> Arc<Self> {
        let backend = Self::default();
        backend.quizzes.lock().unwrap().push(quiz);
        Arc::new(backend)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn fail_next_submission(&self) {
        self.submit_failures
            .lock()
            .unwrap()
            .push_back(ApiError::HttpStatus {
                status: StatusCode::SERVICE_UNAVAILABLE,
                detail: Some("try again".into()),
            });
    }

    pub fn backend(self: &Arc<Self>) -> Backend {
        Backend {
            auth: self.clone(),
            quizzes: self.clone(),
            catalog: self.clone(),
            admin: self.clone(),
            token: TokenSlot::new(),
        }
    }

    pub fn services(self: &Arc<Self>, cache_dir: PathBuf) -> AppServices {
        AppServices::from_parts(
            Storage::in_memory(),
            self.backend(),
            AppSettings::default(),
            cache_dir,
        )
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
            .ok_or(ApiError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                detail: Some("Quiz not found".into()),
            })
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<QuizResult, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(err) = self.submit_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
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
        self.created.lock().unwrap().push(draft.clone());
        Ok(QuizSummary {
            id: QuizId::new("quiz_new"),
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
        Ok(self.generated.lock().unwrap().clone())
    }

    async fn results(&self, student_id: &UserId) -> Result<Vec<ResultRecord>, ApiError> {
        self.results_requested_for
            .lock()
            .unwrap()
            .push(student_id.clone());
        Ok(self.results.lock().unwrap().clone())
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        Ok(vec![Subject {
            id: SubjectId::new("physics"),
            name: "Physics".into(),
            teacher_name: "Jatin".into(),
            description: "Mechanics and more".into(),
            icon: "atom".into(),
            color: "#FF6B6B".into(),
        }])
    }

    async fn chapters(&self, _subject_id: &SubjectId) -> Result<Vec<Chapter>, ApiError> {
        Ok(self.chapters.lock().unwrap().clone())
    }

    async fn topics(&self, chapter_id: &ChapterId) -> Result<Vec<Topic>, ApiError> {
        Ok(vec![Topic {
            id: TopicId::new("t1"),
            chapter_id: chapter_id.clone(),
            name: "Vectors".into(),
            number: 1,
            description: None,
        }])
    }

    async fn videos(&self, _topic_id: &TopicId) -> Result<Vec<Video>, ApiError> {
        Ok(Vec::new())
    }

    async fn pdfs(&self, _topic_id: &TopicId) -> Result<Vec<Pdf>, ApiError> {
        Ok(Vec::new())
    }

    async fn pdf_bytes(&self, _id: &PdfId) -> Result<Vec<u8>, ApiError> {
        Ok(self.pdf_bytes.lock().unwrap().clone())
    }

    async fn add_video(&self, video: &NewVideo) -> Result<Video, ApiError> {
        self.videos_added.lock().unwrap().push(video.clone());
        Ok(Video {
            id: VideoId::new("v1"),
            topic_id: video.topic_id().clone(),
            title: video.title().to_string(),
            description: video.description().map(str::to_string),
            source: VideoSource::YouTube(video.url().clone()),
            duration_secs: None,
        })
    }

    async fn add_pdf(&self, pdf: &NewPdf) -> Result<Pdf, ApiError> {
        Ok(Pdf {
            id: PdfId::new("p1"),
            topic_id: pdf.topic_id().clone(),
            title: pdf.title().to_string(),
            description: pdf.description().map(str::to_string),
        })
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn reset_password(&self, user_id: &UserId, new_password: &str) -> Result<(), ApiError> {
        self.password_resets
            .lock()
            .unwrap()
            .push((user_id.clone(), new_password.to_string()));
        Ok(())
    }
}

pub fn record(id: &str, minutes_ago: i64, score: u32) -> ResultRecord {
    ResultRecord {
        quiz_id: QuizId::new(id),
        quiz_title: format!("Quiz {id}"),
        result: QuizResult::new(score, 10),
        completed_at: fixed_now() - Duration::minutes(minutes_ago),
    }
}
