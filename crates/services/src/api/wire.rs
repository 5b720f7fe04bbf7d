//! JSON shapes exchanged with the backend and their conversion into domain types.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use study_core::model::{
    AuthSession, Chapter, ChapterId, Pdf, PdfId, Question, QuestionDraft, Quiz, QuizId,
    QuizResult, QuizSummary, ResultRecord, Subject, SubjectId, Topic, TopicId, User, UserId,
    Video, VideoId, VideoSource, parse_http_url,
};

use crate::error::ApiError;

fn invalid(what: impl std::fmt::Display) -> ApiError {
    ApiError::InvalidPayload(what.to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// FastAPI sends either a string or a list of validation entries.
    pub(crate) fn message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

// ─── Auth ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct StudentLogin<'a> {
    pub mobile: &'a str,
    pub batch_code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffLogin<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    user_id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    mobile: Option<String>,
    role: String,
    #[serde(default)]
    batch_code: Option<String>,
}

impl UserDto {
    pub(crate) fn into_user(self) -> Result<User, ApiError> {
        Ok(User {
            id: UserId::new(self.user_id),
            name: self.name,
            email: self.email,
            mobile: self.mobile,
            role: self.role.parse().map_err(invalid)?,
            batch_code: self.batch_code,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    user: UserDto,
    session_token: String,
}

impl LoginResponse {
    pub(crate) fn into_session(self) -> Result<AuthSession, ApiError> {
        Ok(AuthSession::new(self.session_token, self.user.into_user()?))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordReset<'a> {
    pub new_password: &'a str,
}

// ─── Quizzes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QuestionDto {
    #[serde(alias = "question_text", alias = "prompt")]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "correct", skip_serializing_if = "Option::is_none")]
    correct_answer: Option<usize>,
}

impl QuestionDto {
    pub(crate) fn from_question(question: &Question) -> Self {
        Self {
            question: question.prompt().to_string(),
            options: question.options().to_vec(),
            correct_answer: question.correct(),
        }
    }

    pub(crate) fn into_draft(self) -> QuestionDraft {
        QuestionDraft {
            prompt: self.question,
            options: self.options,
            correct: self.correct_answer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizDto {
    #[serde(alias = "id")]
    quiz_id: String,
    subject_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    questions: Vec<QuestionDto>,
    time_limit_mins: u32,
}

impl QuizDto {
    pub(crate) fn into_quiz(self) -> Result<Quiz, ApiError> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, q)| Question::new(index, q.question, q.options, q.correct_answer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Quiz::new(
            QuizId::new(self.quiz_id),
            SubjectId::new(self.subject_id),
            self.title,
            self.description,
            questions,
            self.time_limit_mins,
        )?)
    }

    pub(crate) fn into_summary(self) -> QuizSummary {
        QuizSummary {
            id: QuizId::new(self.quiz_id),
            subject_id: SubjectId::new(self.subject_id),
            title: self.title,
            question_count: self.questions.len(),
            time_limit_mins: self.time_limit_mins,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizResultDto {
    score: u32,
    total: u32,
}

impl From<QuizResultDto> for QuizResult {
    fn from(dto: QuizResultDto) -> Self {
        QuizResult::new(dto.score, dto.total)
    }
}

/// The generator has answered both as a bare list and wrapped in `{questions}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GeneratedQuestions {
    Wrapped { questions: Vec<QuestionDto> },
    Bare(Vec<QuestionDto>),
}

impl GeneratedQuestions {
    pub(crate) fn into_drafts(self) -> Vec<QuestionDraft> {
        let (GeneratedQuestions::Wrapped { questions } | GeneratedQuestions::Bare(questions)) =
            self;
        questions.into_iter().map(QuestionDto::into_draft).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultDto {
    quiz_id: String,
    #[serde(default)]
    quiz_title: Option<String>,
    score: u32,
    total: u32,
    #[serde(deserialize_with = "utc_or_naive")]
    completed_at: DateTime<Utc>,
}

/// Timestamps read back from Mongo lose their offset; those are UTC.
fn utc_or_naive<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

impl From<ResultDto> for ResultRecord {
    fn from(dto: ResultDto) -> Self {
        let quiz_title = dto.quiz_title.unwrap_or_else(|| dto.quiz_id.clone());
        ResultRecord {
            quiz_id: QuizId::new(dto.quiz_id),
            quiz_title,
            result: QuizResult::new(dto.score, dto.total),
            completed_at: dto.completed_at,
        }
    }
}

// ─── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectDto {
    subject_id: String,
    name: String,
    #[serde(default)]
    teacher_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    color: String,
}

impl From<SubjectDto> for Subject {
    fn from(dto: SubjectDto) -> Self {
        Subject {
            id: SubjectId::new(dto.subject_id),
            name: dto.name,
            teacher_name: dto.teacher_name,
            description: dto.description,
            icon: dto.icon,
            color: dto.color,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterDto {
    chapter_id: String,
    subject_id: String,
    chapter_name: String,
    chapter_number: u32,
    #[serde(default)]
    description: Option<String>,
}

impl From<ChapterDto> for Chapter {
    fn from(dto: ChapterDto) -> Self {
        Chapter {
            id: ChapterId::new(dto.chapter_id),
            subject_id: SubjectId::new(dto.subject_id),
            name: dto.chapter_name,
            number: dto.chapter_number,
            description: dto.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicDto {
    topic_id: String,
    chapter_id: String,
    topic_name: String,
    topic_number: u32,
    #[serde(default)]
    description: Option<String>,
}

impl From<TopicDto> for Topic {
    fn from(dto: TopicDto) -> Self {
        Topic {
            id: TopicId::new(dto.topic_id),
            chapter_id: ChapterId::new(dto.chapter_id),
            name: dto.topic_name,
            number: dto.topic_number,
            description: dto.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VideoDto {
    #[serde(default, skip_serializing)]
    video_id: String,
    topic_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    video_type: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default, skip_serializing)]
    duration: Option<u32>,
}

impl VideoDto {
    pub(crate) fn youtube(topic_id: &TopicId, title: &str, description: Option<&str>, url: &str) -> Self {
        Self {
            video_id: String::new(),
            topic_id: topic_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            video_type: "youtube".into(),
            video_url: Some(url.to_string()),
            duration: None,
        }
    }

    pub(crate) fn into_video(self, base_url: &str) -> Result<Video, ApiError> {
        let link = self
            .video_url
            .ok_or_else(|| invalid(format!("video {} has no url", self.video_id)))?;
        let source = match self.video_type.as_str() {
            "youtube" => VideoSource::YouTube(parse_http_url(&link).map_err(invalid)?),
            "upload" => {
                // Uploaded files may be served relative to the API root.
                let absolute = if link.starts_with("http") {
                    link
                } else {
                    format!("{}/{}", base_url, link.trim_start_matches('/'))
                };
                VideoSource::Uploaded(parse_http_url(&absolute).map_err(invalid)?)
            }
            other => return Err(invalid(format!("unknown video type: {other}"))),
        };
        Ok(Video {
            id: VideoId::new(self.video_id),
            topic_id: TopicId::new(self.topic_id),
            title: self.title,
            description: self.description,
            source,
            duration_secs: self.duration,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PdfDto {
    pdf_id: String,
    topic_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<PdfDto> for Pdf {
    fn from(dto: PdfDto) -> Self {
        Pdf {
            id: PdfId::new(dto.pdf_id),
            topic_id: TopicId::new(dto.topic_id),
            title: dto.title,
            description: dto.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PdfDataDto {
    pdf_data: String,
}

impl PdfDataDto {
    pub(crate) fn decode(self) -> Result<Vec<u8>, ApiError> {
        // Some uploads were stored as data URLs.
        let data = match self.pdf_data.split_once("base64,") {
            Some((_, rest)) => rest,
            None => self.pdf_data.as_str(),
        };
        STANDARD.decode(data.trim()).map_err(invalid)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPdfDto<'a> {
    pub topic_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub pdf_data: String,
}

pub(crate) fn encode_pdf(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::Role;

    #[test]
    fn login_response_decodes_student() {
        let json = r#"{
            "user": {"user_id": "stu_1", "name": "Asha", "mobile": "98", "role": "student", "batch_code": "B1"},
            "session_token": "session_abc"
        }"#;
        let session = serde_json::from_str::<LoginResponse>(json)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.token(), "session_abc");
        assert_eq!(session.role(), Role::Student);
        assert_eq!(session.user().email, None);
    }

    #[test]
    fn unknown_role_is_invalid_payload() {
        let dto: UserDto =
            serde_json::from_str(r#"{"user_id":"u","name":"n","role":"guest"}"#).unwrap();
        assert!(matches!(dto.into_user(), Err(ApiError::InvalidPayload(_))));
    }

    #[test]
    fn quiz_with_three_options_is_rejected() {
        let json = r#"{
            "quiz_id": "q1", "subject_id": "physics", "title": "Motion", "time_limit_mins": 5,
            "questions": [{"question": "?", "options": ["a","b","c"], "correct_answer": 0}]
        }"#;
        let err = serde_json::from_str::<QuizDto>(json)
            .unwrap()
            .into_quiz()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuiz(_)));
    }

    #[test]
    fn quiz_without_correct_answers_still_loads() {
        let json = r#"{
            "quiz_id": "q1", "subject_id": "physics", "title": "Motion", "time_limit_mins": 1,
            "questions": [{"question_text": "?", "options": ["a","b","c","d"]}]
        }"#;
        let quiz = serde_json::from_str::<QuizDto>(json)
            .unwrap()
            .into_quiz()
            .unwrap();
        assert_eq!(quiz.question_count(), 1);
        assert_eq!(quiz.questions()[0].correct(), None);
    }

    #[test]
    fn generated_questions_accept_both_shapes() {
        let wrapped: GeneratedQuestions = serde_json::from_str(
            r#"{"questions": [{"question": "Q", "options": ["a","b","c","d"], "correct_answer": 2}]}"#,
        )
        .unwrap();
        let bare: GeneratedQuestions =
            serde_json::from_str(r#"[{"question": "Q", "options": ["a"]}]"#).unwrap();
        assert_eq!(wrapped.into_drafts()[0].correct, Some(2));
        assert_eq!(bare.into_drafts()[0].options.len(), 1);
    }

    #[test]
    fn uploaded_video_url_is_resolved_against_base() {
        let dto: VideoDto = serde_json::from_str(
            r#"{"video_id":"v1","topic_id":"t1","title":"Lecture","video_type":"upload","video_url":"/files/v1.mp4","duration":600}"#,
        )
        .unwrap();
        let video = dto.into_video("http://localhost:8001/api").unwrap();
        assert_eq!(
            video.source.url().as_str(),
            "http://localhost:8001/api/files/v1.mp4"
        );
        assert_eq!(video.duration_secs, Some(600));
    }

    #[test]
    fn pdf_data_decodes_plain_and_data_url() {
        let plain = PdfDataDto {
            pdf_data: encode_pdf(b"%PDF-1.4"),
        };
        assert_eq!(plain.decode().unwrap(), b"%PDF-1.4");

        let data_url = PdfDataDto {
            pdf_data: format!("data:application/pdf;base64,{}", encode_pdf(b"%PDF")),
        };
        assert_eq!(data_url.decode().unwrap(), b"%PDF");

        let broken = PdfDataDto {
            pdf_data: "***".into(),
        };
        assert!(matches!(broken.decode(), Err(ApiError::InvalidPayload(_))));
    }

    #[test]
    fn result_timestamps_accept_naive_and_offset_forms() {
        let json = r#"[
            {"quiz_id": "q1", "quiz_title": "Optics", "score": 3, "total": 4, "completed_at": "2024-05-01T10:00:00.123000"},
            {"quiz_id": "q2", "score": 1, "total": 2, "completed_at": "2024-05-01T12:30:00+02:00"}
        ]"#;
        let records: Vec<ResultRecord> = serde_json::from_str::<Vec<ResultDto>>(json)
            .unwrap()
            .into_iter()
            .map(ResultRecord::from)
            .collect();
        assert_eq!(
            records[0].completed_at.to_rfc3339(),
            "2024-05-01T10:00:00.123+00:00"
        );
        assert_eq!(
            records[1].completed_at.to_rfc3339(),
            "2024-05-01T10:30:00+00:00"
        );
        assert_eq!(records[1].quiz_title, "q2");
    }

    #[test]
    fn result_timestamp_garbage_is_rejected() {
        let json = r#"{"quiz_id": "q1", "score": 0, "total": 1, "completed_at": "yesterday"}"#;
        assert!(serde_json::from_str::<ResultDto>(json).is_err());
    }

    #[test]
    fn fastapi_detail_list_is_stringified() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(body.message().unwrap().contains("field required"));
    }
}
