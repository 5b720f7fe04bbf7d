use std::future::{Future, pending};
use std::pin::Pin;
use std::time::Duration;

use study_core::model::{
    AttemptError, AttemptState, AttemptSubmission, Quiz, QuizResult, SubmitDecision,
    SubmitTrigger, TickOutcome,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use super::service::AttemptService;
use crate::error::SubmitError;

const TICK: Duration = Duration::from_secs(1);

type InFlight = Pin<Box<dyn Future<Output = Result<QuizResult, SubmitError>> + Send>>;

/// User intents accepted by a running attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptCommand {
    Start,
    Select { question: usize, option: usize },
    Clear { question: usize },
    /// Explicit submit. Asks for confirmation while questions are unanswered.
    Submit,
    /// Accept the "unanswered questions" confirmation.
    ConfirmSubmit,
    CancelConfirmation,
}

/// What the runner publishes after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSnapshot {
    pub state: AttemptState,
    /// Last submission failure, cleared when a new submission starts.
    pub submit_error: Option<String>,
    /// Last command the state machine refused.
    pub rejected: Option<AttemptError>,
}

/// Owner-side handle to a running attempt. Dropping it cancels the runner.
pub struct AttemptHandle {
    commands: mpsc::UnboundedSender<AttemptCommand>,
    snapshots: watch::Receiver<AttemptSnapshot>,
    task: JoinHandle<()>,
}

impl AttemptHandle {
    /// Queue a command. Returns `false` once the runner has stopped.
    pub fn send(&self, command: AttemptCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(AttemptCommand::Start)
    }

    pub fn select(&self, question: usize, option: usize) -> bool {
        self.send(AttemptCommand::Select { question, option })
    }

    pub fn clear(&self, question: usize) -> bool {
        self.send(AttemptCommand::Clear { question })
    }

    pub fn submit(&self) -> bool {
        self.send(AttemptCommand::Submit)
    }

    pub fn confirm_submit(&self) -> bool {
        self.send(AttemptCommand::ConfirmSubmit)
    }

    pub fn cancel_confirmation(&self) -> bool {
        self.send(AttemptCommand::CancelConfirmation)
    }

    #[must_use]
    pub fn snapshot(&self) -> AttemptSnapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AttemptSnapshot> {
        self.snapshots.clone()
    }

    /// Abandon the attempt: stops the timer and drops any in-flight submission.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            log::debug!("attempt cancelled");
        }
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AttemptHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(super) fn spawn_runner(service: AttemptService, quiz: &Quiz) -> AttemptHandle {
    let state = AttemptState::new(quiz);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (snapshots_tx, snapshots_rx) = watch::channel(AttemptSnapshot {
        state: state.clone(),
        submit_error: None,
        rejected: None,
    });

    let runner = Runner {
        service,
        state,
        submit_error: None,
        rejected: None,
        snapshots: snapshots_tx,
    };
    let task = tokio::spawn(runner.run(commands_rx));

    AttemptHandle {
        commands: commands_tx,
        snapshots: snapshots_rx,
        task,
    }
}

/// Single task that owns the attempt. Commands, ticks and the submission
/// result are serialized through one `select!`, so the state is never touched
/// concurrently.
struct Runner {
    service: AttemptService,
    state: AttemptState,
    submit_error: Option<String>,
    rejected: Option<AttemptError>,
    snapshots: watch::Sender<AttemptSnapshot>,
}

impl Runner {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<AttemptCommand>) {
        let mut ticker: Option<Interval> = None;
        let mut in_flight: Option<InFlight> = None;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        log::debug!("attempt handle dropped; stopping runner");
                        break;
                    };
                    self.on_command(command, &mut ticker, &mut in_flight);
                }
                () = next_tick(&mut ticker) => {
                    self.on_tick(&mut in_flight);
                }
                outcome = settle(&mut in_flight) => {
                    in_flight = None;
                    self.on_submitted(outcome);
                }
            }

            self.publish();
            if self.state.is_submitted() {
                break;
            }
        }
    }

    fn on_command(
        &mut self,
        command: AttemptCommand,
        ticker: &mut Option<Interval>,
        in_flight: &mut Option<InFlight>,
    ) {
        log::debug!("attempt command {command:?}");
        let outcome = match command {
            AttemptCommand::Start => self.state.start().map(|()| {
                let mut interval = interval_at(Instant::now() + TICK, TICK);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                *ticker = Some(interval);
                log::info!(
                    "attempt started for quiz {} ({}s)",
                    self.state.quiz_id(),
                    self.state.remaining_secs()
                );
            }),
            AttemptCommand::Select { question, option } => self.state.select(question, option),
            AttemptCommand::Clear { question } => self.state.clear(question),
            AttemptCommand::Submit => self.request_submit(SubmitTrigger::Explicit, in_flight),
            AttemptCommand::ConfirmSubmit => {
                self.request_submit(SubmitTrigger::Confirmed, in_flight)
            }
            AttemptCommand::CancelConfirmation => {
                self.state.cancel_confirmation();
                Ok(())
            }
        };

        self.rejected = match outcome {
            Ok(()) => None,
            Err(err) => {
                log::debug!("attempt command {command:?} rejected: {err}");
                Some(err)
            }
        };
    }

    fn on_tick(&mut self, in_flight: &mut Option<InFlight>) {
        match self.state.tick() {
            TickOutcome::Counted { remaining_secs } => {
                log::debug!("tick: {remaining_secs}s left");
            }
            TickOutcome::Expired => {
                log::info!("time is up for quiz {}; submitting", self.state.quiz_id());
                if let Err(err) = self.request_submit(SubmitTrigger::Forced, in_flight) {
                    log::warn!("forced submission refused: {err}");
                }
            }
            TickOutcome::Ignored => {}
        }
    }

    fn request_submit(
        &mut self,
        trigger: SubmitTrigger,
        in_flight: &mut Option<InFlight>,
    ) -> Result<(), AttemptError> {
        match self.state.request_submit(trigger)? {
            SubmitDecision::NeedsConfirmation { unanswered } => {
                log::debug!("{unanswered} unanswered; waiting for confirmation");
            }
            SubmitDecision::Proceed(submission) => {
                self.submit_error = None;
                *in_flight = Some(self.submission(submission));
            }
        }
        Ok(())
    }

    fn submission(&self, submission: AttemptSubmission) -> InFlight {
        let service = self.service.clone();
        Box::pin(async move { service.submit(&submission).await })
    }

    fn on_submitted(&mut self, outcome: Result<QuizResult, SubmitError>) {
        let applied = match outcome {
            Ok(result) => self.state.submission_succeeded(result),
            Err(err) => {
                log::warn!("submission failed: {err}");
                self.submit_error = Some(err.to_string());
                self.state.submission_failed()
            }
        };
        if let Err(err) = applied {
            log::warn!("submission outcome ignored: {err}");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(AttemptSnapshot {
            state: self.state.clone(),
            submit_error: self.submit_error.clone(),
            rejected: self.rejected.clone(),
        });
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

async fn settle(in_flight: &mut Option<InFlight>) -> Result<QuizResult, SubmitError> {
    match in_flight {
        Some(submission) => submission.await,
        None => pending().await,
    }
}
