mod attempt_vm;
mod history_vm;
mod result_vm;
mod time_fmt;

pub use attempt_vm::{AttemptVm, OptionVm, QuestionVm};
pub use history_vm::{HistoryRowVm, map_history_rows};
pub use result_vm::ResultVm;
pub use time_fmt::format_datetime;
