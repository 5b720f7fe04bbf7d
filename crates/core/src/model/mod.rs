mod app_settings;
mod attempt;
mod catalog;
mod ids;
mod quiz;
mod quiz_draft;
mod result;
mod user;

pub use ids::{ChapterId, ParseIdError, PdfId, QuizId, SubjectId, TopicId, UserId, VideoId};

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError, DEFAULT_API_BASE_URL};
pub use attempt::{
    AttemptError, AttemptPhase, AttemptState, AttemptSubmission, SubmitDecision, SubmitTrigger,
    TickOutcome, UNANSWERED,
};
pub use catalog::{
    CatalogError, Chapter, NewPdf, NewVideo, Pdf, Subject, Topic, Video, VideoSource,
    parse_http_url,
};
pub use quiz::{OPTION_COUNT, Question, Quiz, QuizError, QuizSummary};
pub use quiz_draft::{QuestionDraft, QuizDraft, QuizDraftError, ValidQuizDraft};
pub use result::{
    PASS_THRESHOLD_PERCENT, QuizResult, ResultRecord, ResultVerdict, sort_newest_first,
};
pub use user::{
    AuthSession, Credentials, MIN_PASSWORD_LEN, Role, User, UserError, validate_new_password,
};
