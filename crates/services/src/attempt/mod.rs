//! Timed quiz attempts: loading, submitting and the countdown runner.

mod runner;
mod service;

pub use runner::{AttemptCommand, AttemptHandle, AttemptSnapshot};
pub use service::AttemptService;
