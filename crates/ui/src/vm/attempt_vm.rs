use services::AttemptSnapshot;
use study_core::format_countdown;
use study_core::model::{AttemptPhase, Quiz};

use crate::vm::result_vm::ResultVm;

/// Below this many seconds the countdown is highlighted.
const LOW_TIME_SECS: u32 = 60;

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub answered: bool,
}

/// Everything the attempt screen renders, derived from the latest snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptVm {
    pub title: String,
    pub description: Option<String>,
    pub phase: AttemptPhase,
    pub countdown: String,
    pub low_time: bool,
    pub intro_label: String,
    pub progress_label: String,
    pub questions: Vec<QuestionVm>,
    pub editable: bool,
    pub submitting: bool,
    pub expired: bool,
    pub confirmation: Option<String>,
    pub submit_error: Option<String>,
    pub notice: Option<String>,
    pub result: Option<ResultVm>,
}

impl AttemptVm {
    #[must_use]
    pub fn new(quiz: &Quiz, snapshot: &AttemptSnapshot) -> Self {
        let state = &snapshot.state;
        let phase = state.phase();
        let remaining = state.remaining_secs();

        let questions = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = state.answer(index);
                QuestionVm {
                    index,
                    number: index + 1,
                    prompt: question.prompt().to_string(),
                    options: question
                        .options()
                        .iter()
                        .zip(OPTION_LETTERS)
                        .enumerate()
                        .map(|(option, (text, letter))| OptionVm {
                            index: option,
                            letter,
                            text: text.clone(),
                            selected: selected == Some(option),
                        })
                        .collect(),
                    answered: selected.is_some(),
                }
            })
            .collect();

        let confirmation = state.pending_confirmation().then(|| {
            let unanswered = state.unanswered_count();
            let noun = if unanswered == 1 { "question is" } else { "questions are" };
            format!("{unanswered} {noun} still unanswered. Submit anyway?")
        });

        let submit_error = snapshot.submit_error.as_ref().map(|err| {
            if state.is_expired() {
                format!("Time is up, but your answers were not recorded: {err}")
            } else {
                err.clone()
            }
        });

        Self {
            title: quiz.title().to_string(),
            description: quiz.description().map(str::to_string),
            phase,
            countdown: format_countdown(remaining),
            low_time: phase == AttemptPhase::Running && remaining <= LOW_TIME_SECS,
            intro_label: format!(
                "{} questions · {} min",
                quiz.question_count(),
                quiz.time_limit_mins()
            ),
            progress_label: format!(
                "{} of {} answered",
                state.answered_count(),
                state.question_count()
            ),
            questions,
            editable: phase == AttemptPhase::Running && !state.is_submitting() && !state.is_expired(),
            submitting: state.is_submitting(),
            expired: state.is_expired(),
            confirmation,
            submit_error,
            notice: snapshot.rejected.as_ref().map(ToString::to_string),
            result: state.result().map(ResultVm::from),
        }
    }

    /// Whether the submit button should be offered.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase == AttemptPhase::Running && !self.submitting && self.confirmation.is_none()
    }
}
