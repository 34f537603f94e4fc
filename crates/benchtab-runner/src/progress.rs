//! Phase detection and the single-line progress status.

use std::io::{self, Stderr, Write};

use benchtab_core::{HEADER_KEYS, strip_ansi};

/// Width the status line is padded or truncated to.
pub const STATUS_WIDTH: usize = 120;

/// Coarse stage of a benchmark run, as shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Compiling,
    Compiled,
    Running,
    Collecting,
    TableDetected,
    Finished(i32),
    Parsing,
    WritingSnapshot,
    PrintingCharts,
}

impl Phase {
    pub fn message(&self) -> String {
        match self {
            Phase::Starting => "Phase: starting command".to_string(),
            Phase::Compiling => "Phase: compiling".to_string(),
            Phase::Compiled => "Phase: compile finished, preparing to run benches".to_string(),
            Phase::Running => "Phase: running benches".to_string(),
            Phase::Collecting => "Phase: running benches, collecting results".to_string(),
            Phase::TableDetected => "Phase: benchmark table detected".to_string(),
            Phase::Finished(0) => "Phase: command finished, parsing output".to_string(),
            Phase::Finished(code) => {
                format!("Phase: command finished with exit code {code}, parsing output")
            }
            Phase::Parsing => "Phase: parsing output".to_string(),
            Phase::WritingSnapshot => "Phase: writing JSON snapshot".to_string(),
            Phase::PrintingCharts => "Phase: printing charts".to_string(),
        }
    }
}

pub fn is_compiling_line(line: &str) -> bool {
    line.starts_with("Compiling ") || line.starts_with("Building ")
}

pub fn is_compiled_line(line: &str) -> bool {
    line.contains("Finished `bench` profile") || line.starts_with("Finished `bench`")
}

pub fn is_running_line(line: &str) -> bool {
    line.starts_with("Running ")
}

/// Harness preamble printed once the bench binary is executing.
pub fn is_collecting_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("timer precision") || lower.contains("tracing will be piped")
}

/// Contains every report header keyword, in any order.
pub fn is_table_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYS.iter().all(|key| lower.contains(*key))
}

/// Phase signalled by one output line.
///
/// `line` must already be stripped of color codes and surrounding
/// whitespace. The collecting phase only counts once a `Running` line has
/// been seen.
pub fn classify_progress(line: &str, running_seen: bool) -> Option<Phase> {
    if is_compiling_line(line) {
        Some(Phase::Compiling)
    } else if is_compiled_line(line) {
        Some(Phase::Compiled)
    } else if is_running_line(line) {
        Some(Phase::Running)
    } else if is_collecting_line(line) {
        running_seen.then_some(Phase::Collecting)
    } else if is_table_header_line(line) {
        Some(Phase::TableDetected)
    } else {
        None
    }
}

/// Receives progress events from the runner.
pub trait ProgressObserver {
    /// Inspect one raw line of command output.
    fn observe_line(&mut self, line: &str) -> io::Result<()>;

    /// Move to an explicit phase.
    fn set_phase(&mut self, phase: Phase) -> io::Result<()>;

    /// Finish the current status line so log records start on their own line.
    fn break_line(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Carriage-return status line, rewritten only when the phase changes.
#[derive(Debug)]
pub struct ProgressReporter<W: Write = Stderr> {
    out: W,
    current: Option<Phase>,
    running_seen: bool,
    visible: bool,
}

impl ProgressReporter<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: None,
            running_seen: false,
            visible: false,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.current
    }

    /// Blank the status line and return the cursor to column zero.
    pub fn clear(&mut self) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        write!(self.out, "\r{}\r", " ".repeat(STATUS_WIDTH))?;
        self.out.flush()?;
        self.visible = false;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_status(&mut self, message: &str) -> io::Result<()> {
        let shown: String = message.chars().take(STATUS_WIDTH).collect();
        write!(self.out, "\r{shown:<width$}", width = STATUS_WIDTH)?;
        self.out.flush()?;
        self.visible = true;
        Ok(())
    }
}

impl<W: Write> ProgressObserver for ProgressReporter<W> {
    fn observe_line(&mut self, line: &str) -> io::Result<()> {
        let stripped = strip_ansi(line);
        match classify_progress(stripped.trim(), self.running_seen) {
            Some(phase) => self.set_phase(phase),
            None => Ok(()),
        }
    }

    fn set_phase(&mut self, phase: Phase) -> io::Result<()> {
        if phase == Phase::Running {
            self.running_seen = true;
        }
        if self.current == Some(phase) {
            return Ok(());
        }
        tracing::trace!(component = "progress", phase = ?phase, "Phase changed");
        self.current = Some(phase);
        self.write_status(&phase.message())
    }

    fn break_line(&mut self) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        writeln!(self.out)?;
        self.out.flush()?;
        self.visible = false;
        Ok(())
    }
}
