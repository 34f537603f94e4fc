//! Runs a benchmark command through the shell, echoing its output live while
//! keeping a copy for parsing, with an optional progress status line.

pub mod process;
pub mod progress;

pub use process::{RunOutput, RunnerError, SIGNAL_EXIT_CODE, run_command_streaming, shell_command};
pub use progress::{Phase, ProgressObserver, ProgressReporter, classify_progress};
