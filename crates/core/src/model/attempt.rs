use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::quiz::{OPTION_COUNT, Quiz};
use crate::model::result::QuizResult;

/// Wire value for an unanswered question.
pub const UNANSWERED: i64 = -1;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("the quiz has not been started")]
    NotStarted,

    #[error("the quiz is already running")]
    AlreadyStarted,

    #[error("the quiz has already been submitted")]
    AlreadySubmitted,

    #[error("a submission is already in progress")]
    SubmissionInFlight,

    #[error("no submission is in progress")]
    NoSubmissionInFlight,

    #[error("time is up; answers can no longer be changed")]
    TimeUp,

    #[error("forced submission requires the timer to have expired")]
    NotExpired,

    #[error("question {index} is out of range (quiz has {count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("option {index} is out of range")]
    OptionOutOfRange { index: usize },
}

//
// ─── PHASES AND OUTCOMES ───────────────────────────────────────────────────────
//

/// Lifecycle of one attempt: `NotStarted → Running → Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    NotStarted,
    Running,
    Submitted,
}

/// What caused a submission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// The student pressed submit.
    Explicit,
    /// The student accepted the "unanswered questions" confirmation.
    Confirmed,
    /// The countdown reached zero.
    Forced,
}

/// Result of a single timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was decremented; the attempt keeps running.
    Counted { remaining_secs: u32 },
    /// This tick consumed the last second. A forced submission must follow.
    Expired,
    /// The tick had no effect (not running, submitting, submitted or already expired).
    Ignored,
}

/// Answer to a submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Unanswered questions remain; the student must confirm first.
    NeedsConfirmation { unanswered: usize },
    /// The attempt is now submitting; send this payload to the backend.
    Proceed(AttemptSubmission),
}

/// Payload for `POST /quiz/attempt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSubmission {
    pub quiz_id: QuizId,
    pub answers: Vec<i64>,
    pub trigger: SubmitTrigger,
}

//
// ─── ATTEMPT STATE ─────────────────────────────────────────────────────────────
//

/// In-memory state of one student's pass through a quiz.
///
/// Invariants:
/// - `answers.len()` always equals the quiz's question count.
/// - `remaining_secs` never increases, and never changes outside `Running`.
/// - the transition into `Submitted` happens at most once and is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    quiz_id: QuizId,
    answers: Vec<Option<usize>>,
    remaining_secs: u32,
    phase: AttemptPhase,
    submitting: bool,
    expired: bool,
    pending_confirmation: bool,
    result: Option<QuizResult>,
}

impl AttemptState {
    /// Fresh state for a loaded quiz: every answer unset, full time remaining.
    #[must_use]
    pub fn new(quiz: &Quiz) -> Self {
        Self {
            quiz_id: quiz.id().clone(),
            answers: vec![None; quiz.question_count()],
            remaining_secs: quiz.time_limit_secs(),
            phase: AttemptPhase::NotStarted,
            submitting: false,
            expired: false,
            pending_confirmation: false,
            result: None,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != AttemptPhase::NotStarted
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == AttemptPhase::Submitted
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    #[must_use]
    pub fn pending_confirmation(&self) -> bool {
        self.pending_confirmation
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.question_count() - self.answered_count()
    }

    /// Answers as sent to the backend: option index, or `-1` when unanswered.
    #[must_use]
    pub fn wire_answers(&self) -> Vec<i64> {
        self.answers
            .iter()
            .map(|answer| answer.map_or(UNANSWERED, |index| index as i64))
            .collect()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// `NotStarted → Running`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyStarted` or `AttemptError::AlreadySubmitted`
    /// when the attempt is past `NotStarted`.
    pub fn start(&mut self) -> Result<(), AttemptError> {
        match self.phase {
            AttemptPhase::NotStarted => {
                self.phase = AttemptPhase::Running;
                Ok(())
            }
            AttemptPhase::Running => Err(AttemptError::AlreadyStarted),
            AttemptPhase::Submitted => Err(AttemptError::AlreadySubmitted),
        }
    }

    /// Apply one second of countdown.
    ///
    /// Ticks only count while running with no submission in flight. The tick
    /// that reaches zero reports `Expired` exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != AttemptPhase::Running || self.submitting || self.expired {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.expired = true;
            self.pending_confirmation = false;
            return TickOutcome::Expired;
        }

        TickOutcome::Counted {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Record the selected option for a question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` when the attempt is not accepting answers or an
    /// index is out of range.
    pub fn select(&mut self, question: usize, option: usize) -> Result<(), AttemptError> {
        self.ensure_editable()?;
        if option >= OPTION_COUNT {
            return Err(AttemptError::OptionOutOfRange { index: option });
        }
        let count = self.answers.len();
        let slot = self
            .answers
            .get_mut(question)
            .ok_or(AttemptError::QuestionOutOfRange {
                index: question,
                count,
            })?;
        *slot = Some(option);
        Ok(())
    }

    /// Un-answer a question.
    ///
    /// # Errors
    ///
    /// Same conditions as [`AttemptState::select`].
    pub fn clear(&mut self, question: usize) -> Result<(), AttemptError> {
        self.ensure_editable()?;
        let count = self.answers.len();
        let slot = self
            .answers
            .get_mut(question)
            .ok_or(AttemptError::QuestionOutOfRange {
                index: question,
                count,
            })?;
        *slot = None;
        Ok(())
    }

    /// Ask to submit.
    ///
    /// An explicit request with unanswered questions only raises the
    /// confirmation flag. Confirmed and forced requests (and explicit requests
    /// after the timer expired) mark the attempt as submitting and hand back the
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` when the attempt was never started, is already
    /// submitting or submitted, or a forced request arrives before expiry.
    pub fn request_submit(&mut self, trigger: SubmitTrigger) -> Result<SubmitDecision, AttemptError> {
        match self.phase {
            AttemptPhase::NotStarted => return Err(AttemptError::NotStarted),
            AttemptPhase::Submitted => return Err(AttemptError::AlreadySubmitted),
            AttemptPhase::Running => {}
        }
        if self.submitting {
            return Err(AttemptError::SubmissionInFlight);
        }
        if trigger == SubmitTrigger::Forced && !self.expired {
            return Err(AttemptError::NotExpired);
        }

        let unanswered = self.unanswered_count();
        if trigger == SubmitTrigger::Explicit && !self.expired && unanswered > 0 {
            self.pending_confirmation = true;
            return Ok(SubmitDecision::NeedsConfirmation { unanswered });
        }

        self.pending_confirmation = false;
        self.submitting = true;
        Ok(SubmitDecision::Proceed(AttemptSubmission {
            quiz_id: self.quiz_id.clone(),
            answers: self.wire_answers(),
            trigger,
        }))
    }

    /// Dismiss the "unanswered questions" confirmation without submitting.
    pub fn cancel_confirmation(&mut self) {
        self.pending_confirmation = false;
    }

    /// The backend rejected or never received the submission. The attempt goes
    /// back to running so the student can retry.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoSubmissionInFlight` if nothing was submitting.
    pub fn submission_failed(&mut self) -> Result<(), AttemptError> {
        if !self.submitting {
            return Err(AttemptError::NoSubmissionInFlight);
        }
        self.submitting = false;
        Ok(())
    }

    /// `Running → Submitted` with the backend's score.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoSubmissionInFlight` if nothing was submitting.
    pub fn submission_succeeded(&mut self, result: QuizResult) -> Result<(), AttemptError> {
        if !self.submitting {
            return Err(AttemptError::NoSubmissionInFlight);
        }
        self.submitting = false;
        self.phase = AttemptPhase::Submitted;
        self.result = Some(result);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), AttemptError> {
        match self.phase {
            AttemptPhase::NotStarted => Err(AttemptError::NotStarted),
            AttemptPhase::Submitted => Err(AttemptError::AlreadySubmitted),
            AttemptPhase::Running if self.submitting => Err(AttemptError::SubmissionInFlight),
            AttemptPhase::Running if self.expired => Err(AttemptError::TimeUp),
            AttemptPhase::Running => Ok(()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
