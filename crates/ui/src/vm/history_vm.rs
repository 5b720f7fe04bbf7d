use study_core::model::{QuizId, ResultRecord, ResultVerdict};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub quiz_id: QuizId,
    pub title: String,
    pub score_label: String,
    pub percentage_label: String,
    pub completed_at_str: String,
    pub passed: bool,
}

impl From<&ResultRecord> for HistoryRowVm {
    fn from(record: &ResultRecord) -> Self {
        Self {
            quiz_id: record.quiz_id.clone(),
            title: record.quiz_title.clone(),
            score_label: format!("{} / {}", record.result.score(), record.result.total()),
            percentage_label: format!("{}%", record.result.percentage()),
            completed_at_str: format_datetime(record.completed_at),
            passed: record.result.verdict() == ResultVerdict::Positive,
        }
    }
}

#[must_use]
pub fn map_history_rows(records: &[ResultRecord]) -> Vec<HistoryRowVm> {
    records.iter().map(HistoryRowVm::from).collect()
}
