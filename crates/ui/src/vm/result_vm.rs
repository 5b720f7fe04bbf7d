use study_core::model::{QuizResult, ResultVerdict};

/// Score card shown when an attempt is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub percentage_label: String,
    pub message: &'static str,
    pub passed: bool,
}

impl From<&QuizResult> for ResultVm {
    fn from(result: &QuizResult) -> Self {
        let verdict = result.verdict();
        Self {
            score_label: format!("{} / {}", result.score(), result.total()),
            percentage_label: format!("{}%", result.percentage()),
            message: verdict.message(),
            passed: verdict == ResultVerdict::Positive,
        }
    }
}
