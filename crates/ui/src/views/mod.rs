mod admin;
mod chapter;
mod create_quiz;
mod history;
mod home;
mod login;
mod prompt_host;
mod quiz;
mod settings;
mod state;
mod subject;
mod topic;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use admin::AdminView;
pub use chapter::ChapterView;
pub use create_quiz::CreateQuizView;
pub use history::HistoryView;
pub use home::HomeView;
pub use login::LoginView;
pub use prompt_host::PromptHost;
pub use quiz::QuizView;
pub use settings::SettingsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use subject::SubjectView;
pub use topic::TopicView;
