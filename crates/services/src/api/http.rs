use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use study_core::model::{
    AttemptSubmission, AuthSession, Chapter, ChapterId, Credentials, NewPdf, NewVideo, Pdf,
    PdfId, QuestionDraft, Quiz, QuizId, QuizResult, QuizSummary, ResultRecord, Subject,
    SubjectId, Topic, TopicId, User, UserId, ValidQuizDraft, Video,
};

use super::wire::{
    ChapterDto, ErrorBody, GeneratedQuestions, LoginResponse, NewPdfDto, PasswordReset, PdfDataDto,
    PdfDto, QuestionDto, QuizDto, QuizResultDto, ResultDto, StaffLogin, StudentLogin, SubjectDto,
    TopicDto, UserDto, VideoDto, encode_pdf,
};
use super::{AdminApi, AuthApi, CatalogApi, QuizApi, TokenSlot};
use crate::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// REST client for the study backend. All paths are relative to a base URL
/// ending in `/api`.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    base_url: String,
    token: TokenSlot,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::BaseUrl` if `base_url` cannot carry a path and
    /// `ApiError::Http` if the client cannot be built.
    pub fn new(base_url: &str, token: TokenSlot) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|_| ApiError::BaseUrl(base_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base,
            base_url,
            token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL. Ids are percent-encoded, so a
    /// `/` or `?` inside one stays part of that segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.authorized(self.client.get(self.url(segments)))
    }

    fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.authorized(self.client.post(self.url(segments)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turn a non-2xx response into an `ApiError`, keeping FastAPI's `detail`.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::message);
    log::debug!("request failed: {status} {detail:?}");
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized { detail },
        StatusCode::FORBIDDEN => ApiError::Forbidden { detail },
        _ => ApiError::HttpStatus { status, detail },
    })
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let request = match credentials {
            Credentials::Student { mobile, batch_code } => self
                .client
                .post(self.url(&["auth", "login", "student"]))
                .json(&StudentLogin { mobile, batch_code }),
            Credentials::Teacher { email, password } => self
                .client
                .post(self.url(&["auth", "login", "teacher"]))
                .json(&StaffLogin { email, password }),
            Credentials::Admin { email, password } => self
                .client
                .post(self.url(&["auth", "login", "admin"]))
                .json(&StaffLogin { email, password }),
        };
        let body: LoginResponse = self.send_json(request).await?;
        body.into_session()
    }

    async fn me(&self) -> Result<User, ApiError> {
        let body: UserDto = self.send_json(self.get(&["auth", "me"])).await?;
        body.into_user()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        check_status(self.post(&["auth", "logout"]).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizApi for HttpApi {
    async fn fetch_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError> {
        let body: QuizDto = self
            .send_json(self.get(&["quiz", "detail", id.as_str()]))
            .await?;
        body.into_quiz()
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<QuizResult, ApiError> {
        let answers_json =
            serde_json::to_string(&submission.answers).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
        let form = [
            ("quiz_id", submission.quiz_id.as_str()),
            ("answers_json", answers_json.as_str()),
        ];
        let body: QuizResultDto = self.send_json(self.post(&["quiz", "attempt"]).form(&form)).await?;
        Ok(body.into())
    }

    async fn list_quizzes(&self, subject_id: &SubjectId) -> Result<Vec<QuizSummary>, ApiError> {
        let body: Vec<QuizDto> = self
            .send_json(self.get(&["quiz", "subject", subject_id.as_str()]))
            .await?;
        Ok(body.into_iter().map(QuizDto::into_summary).collect())
    }

    async fn create_quiz(&self, draft: &ValidQuizDraft) -> Result<QuizSummary, ApiError> {
        let questions: Vec<QuestionDto> = draft
            .questions()
            .iter()
            .map(QuestionDto::from_question)
            .collect();
        let questions_json =
            serde_json::to_string(&questions).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
        let time_limit = draft.time_limit_mins().to_string();
        let form = [
            ("title", draft.title()),
            ("description", draft.description().unwrap_or_default()),
            ("questions_json", questions_json.as_str()),
            ("time_limit_mins", time_limit.as_str()),
            ("subject_id", draft.subject_id().as_str()),
        ];
        let body: QuizDto = self.send_json(self.post(&["quiz"]).form(&form)).await?;
        Ok(body.into_summary())
    }

    async fn generate_questions(
        &self,
        subject_id: &SubjectId,
        topic: &str,
        count: u32,
    ) -> Result<Vec<QuestionDraft>, ApiError> {
        let count = count.to_string();
        let form = [
            ("subject_id", subject_id.as_str()),
            ("topic", topic),
            ("num_questions", count.as_str()),
        ];
        let body: GeneratedQuestions = self
            .send_json(self.post(&["ai", "generate-quiz"]).form(&form))
            .await?;
        Ok(body.into_drafts())
    }

    async fn results(&self, student_id: &UserId) -> Result<Vec<ResultRecord>, ApiError> {
        let body: Vec<ResultDto> = self
            .send_json(self.get(&["quiz", "results", student_id.as_str()]))
            .await?;
        Ok(body.into_iter().map(ResultRecord::from).collect())
    }
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let body: Vec<SubjectDto> = self.send_json(self.get(&["subjects"])).await?;
        Ok(body.into_iter().map(Subject::from).collect())
    }

    async fn chapters(&self, subject_id: &SubjectId) -> Result<Vec<Chapter>, ApiError> {
        let body: Vec<ChapterDto> = self
            .send_json(self.get(&["subjects", subject_id.as_str(), "chapters"]))
            .await?;
        Ok(body.into_iter().map(Chapter::from).collect())
    }

    async fn topics(&self, chapter_id: &ChapterId) -> Result<Vec<Topic>, ApiError> {
        let body: Vec<TopicDto> = self
            .send_json(self.get(&["chapters", chapter_id.as_str(), "topics"]))
            .await?;
        Ok(body.into_iter().map(Topic::from).collect())
    }

    async fn videos(&self, topic_id: &TopicId) -> Result<Vec<Video>, ApiError> {
        let body: Vec<VideoDto> = self
            .send_json(self.get(&["topics", topic_id.as_str(), "videos"]))
            .await?;
        body.into_iter()
            .map(|dto| dto.into_video(&self.base_url))
            .collect()
    }

    async fn pdfs(&self, topic_id: &TopicId) -> Result<Vec<Pdf>, ApiError> {
        let body: Vec<PdfDto> = self
            .send_json(self.get(&["topics", topic_id.as_str(), "pdfs"]))
            .await?;
        Ok(body.into_iter().map(Pdf::from).collect())
    }

    async fn pdf_bytes(&self, id: &PdfId) -> Result<Vec<u8>, ApiError> {
        let body: PdfDataDto = self.send_json(self.get(&["pdfs", id.as_str()])).await?;
        body.decode()
    }

    async fn add_video(&self, video: &NewVideo) -> Result<Video, ApiError> {
        let payload = VideoDto::youtube(
            video.topic_id(),
            video.title(),
            video.description(),
            video.url().as_str(),
        );
        let body: VideoDto = self.send_json(self.post(&["videos"]).json(&payload)).await?;
        body.into_video(&self.base_url)
    }

    async fn add_pdf(&self, pdf: &NewPdf) -> Result<Pdf, ApiError> {
        let payload = NewPdfDto {
            topic_id: pdf.topic_id().as_str(),
            title: pdf.title(),
            description: pdf.description(),
            pdf_data: encode_pdf(pdf.bytes()),
        };
        let body: PdfDto = self.send_json(self.post(&["pdfs"]).json(&payload)).await?;
        Ok(body.into())
    }
}

#[async_trait]
impl AdminApi for HttpApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let body: Vec<UserDto> = self.send_json(self.get(&["admin", "users"])).await?;
        body.into_iter().map(UserDto::into_user).collect()
    }

    async fn reset_password(&self, user_id: &UserId, new_password: &str) -> Result<(), ApiError> {
        let request = self
            .authorized(self.client.put(self.url(&["admin", "users", user_id.as_str(), "password"])))
            .json(&PasswordReset { new_password });
        check_status(request.send().await?).await?;
        Ok(())
    }
}
