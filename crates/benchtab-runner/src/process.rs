//! Spawning the benchmark command and teeing its output.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use crate::progress::{Phase, ProgressObserver};

/// Exit code reported when the process was terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Errors raised while running the external command.
#[derive(Debug)]
pub enum RunnerError {
    /// The shell could not be started.
    Spawn {
        command: String,
        source: io::Error,
    },
    /// Reading the command's output or writing it through failed.
    Io(io::Error),
}

impl RunnerError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            RunnerError::Spawn { .. } => "SPAWN",
            RunnerError::Io(_) => "RUNNER_IO",
        }
    }
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::Spawn { command, source } => write!(
                f,
                "[{}] Failed to start `{}`: {}",
                self.code(),
                command,
                source
            ),
            RunnerError::Io(source) => {
                write!(f, "[{}] Command output stream failed: {}", self.code(), source)
            }
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Spawn { source, .. } | RunnerError::Io(source) => Some(source),
        }
    }
}

impl From<io::Error> for RunnerError {
    fn from(err: io::Error) -> Self {
        RunnerError::Io(err)
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: i32,
    /// Everything the command printed, standard error included.
    pub text: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Shell invocation for `cmd` with standard error folded into standard output.
#[cfg(unix)]
pub fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(format!("exec 2>&1\n{cmd}"));
    command
}

/// Shell invocation for `cmd` with standard error folded into standard output.
#[cfg(windows)]
pub fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(format!("{cmd} 2>&1"));
    command
}

/// Run `cmd`, writing each line to `sink` as it arrives and buffering it.
///
/// Returns once the command exits, whatever its exit status.
pub fn run_command_streaming<W: Write>(
    cmd: &str,
    sink: &mut W,
    mut progress: Option<&mut dyn ProgressObserver>,
) -> Result<RunOutput, RunnerError> {
    tracing::info!(component = "runner", operation = "spawn", cmd, "Starting command");
    if let Some(observer) = progress.as_mut() {
        observer.set_phase(Phase::Starting)?;
    }

    let mut child = shell_command(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| RunnerError::Spawn {
            command: cmd.to_string(),
            source,
        })?;

    let text = match tee_output(&mut child, sink, &mut progress) {
        Ok(text) => text,
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }
    };

    let status = child.wait()?;
    let exit_code = status.code().unwrap_or(SIGNAL_EXIT_CODE);
    if let Some(observer) = progress.as_mut() {
        observer.set_phase(Phase::Finished(exit_code))?;
        observer.break_line()?;
    }
    tracing::info!(
        component = "runner",
        operation = "wait",
        exit_code,
        bytes = text.len(),
        "Command finished"
    );
    Ok(RunOutput { exit_code, text })
}

fn tee_output<W: Write>(
    child: &mut Child,
    sink: &mut W,
    progress: &mut Option<&mut dyn ProgressObserver>,
) -> Result<String, RunnerError> {
    let Some(stdout) = child.stdout.take() else {
        return Ok(String::new());
    };
    let mut reader = BufReader::new(stdout);
    let mut text = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        sink.write_all(&line)?;
        sink.flush()?;

        let decoded = String::from_utf8_lossy(&line);
        if let Some(observer) = progress.as_mut() {
            observer.observe_line(&decoded)?;
        }
        text.push_str(&decoded);
    }
    Ok(text)
}
