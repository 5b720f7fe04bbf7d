use chrono::{DateTime, Utc};

use crate::model::ids::QuizId;

/// Percentage at or above which a result counts as a pass.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

/// Score returned by the backend for one submitted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    total: u32,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self { score, total }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// `round(score / total * 100)`, or `0` for an empty quiz.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let ratio = f64::from(self.score) / f64::from(self.total) * 100.0;
        ratio.round() as u32
    }

    #[must_use]
    pub fn verdict(&self) -> ResultVerdict {
        if self.percentage() >= PASS_THRESHOLD_PERCENT {
            ResultVerdict::Positive
        } else {
            ResultVerdict::Encouragement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultVerdict {
    Positive,
    Encouragement,
}

impl ResultVerdict {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResultVerdict::Positive => "Great job! Keep it up.",
            ResultVerdict::Encouragement => "Keep practicing. You'll get there!",
        }
    }
}

/// A past attempt as listed in the results history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub result: QuizResult,
    pub completed_at: DateTime<Utc>,
}

/// Newest first.
pub fn sort_newest_first(records: &mut [ResultRecord]) {
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
}
