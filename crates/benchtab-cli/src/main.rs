mod chart;
mod logging;

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use benchtab_core::config::{DEFAULT_CASE_MARKER, DEFAULT_GROUP_MARKER, DEFAULT_HEAD_LINES};
use benchtab_core::snapshot::write_snapshot;
use benchtab_core::{Baseline, DEFAULT_BAR_WIDTH, ParserConfig, RunContext, parse_report};
use benchtab_runner::{Phase, ProgressObserver, ProgressReporter, run_command_streaming};
use chrono::{SecondsFormat, Utc};
use clap::Parser;

use crate::chart::{ChartOptions, render_charts};

const DEFAULT_CMD: &str =
    "cargo bench --bench e2e_http_client_server --features http-full,rustls,boring";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run a divan benchmark command, then chart or snapshot its report"
)]
struct Cli {
    /// Shell command that produces the benchmark report
    #[arg(long, default_value = DEFAULT_CMD)]
    cmd: String,

    /// Write the parsed run as a JSON snapshot instead of printing charts
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Snapshot to compare mean values against (ignored with --json-out)
    #[arg(long)]
    compare_to: Option<PathBuf>,

    /// Parse the output even when the command exits with a non-zero status
    #[arg(long)]
    allow_nonzero: bool,

    /// Enable debug logging and the progress status line
    #[arg(long)]
    debug: bool,

    /// Disable the progress status line
    #[arg(long)]
    no_progress: bool,

    /// Width of chart bars in characters
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    bar_width: usize,

    /// Number of raw output lines kept in the snapshot
    #[arg(long, default_value_t = DEFAULT_HEAD_LINES)]
    head_lines: usize,

    /// Text that identifies a benchmark case row
    #[arg(long, default_value = DEFAULT_CASE_MARKER)]
    case_marker: String,

    /// Text that identifies a benchmark group row
    #[arg(long, default_value = DEFAULT_GROUP_MARKER)]
    group_marker: String,
}

impl Cli {
    fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .with_head_lines(self.head_lines)
            .with_case_marker(self.case_marker.as_str())
            .with_group_marker(self.group_marker.as_str())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Exit status for a failed command; codes outside 1..=255 become 1.
fn command_exit_status(code: i32) -> u8 {
    u8::try_from(code)
        .ok()
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

fn set_phase(reporter: &mut Option<ProgressReporter>, phase: Phase) -> io::Result<()> {
    match reporter.as_mut() {
        Some(reporter) => reporter.set_phase(phase),
        None => Ok(()),
    }
}

fn clear_status(reporter: &mut Option<ProgressReporter>) -> io::Result<()> {
    match reporter.as_mut() {
        Some(reporter) => reporter.clear(),
        None => Ok(()),
    }
}

/// End a visible status line before steps that log.
fn break_status(reporter: &mut Option<ProgressReporter>) -> io::Result<()> {
    match reporter.as_mut() {
        Some(reporter) => reporter.break_line(),
        None => Ok(()),
    }
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug)?;

    let mut reporter = (cli.debug && !cli.no_progress).then(ProgressReporter::stderr);
    let output = {
        let mut stdout = io::stdout().lock();
        let observer = reporter
            .as_mut()
            .map(|reporter| reporter as &mut dyn ProgressObserver);
        run_command_streaming(&cli.cmd, &mut stdout, observer)?
    };

    if !output.success() && !cli.allow_nonzero {
        clear_status(&mut reporter)?;
        tracing::warn!(
            component = "cli",
            operation = "run",
            status = "failed",
            exit_code = output.exit_code,
            "Command failed"
        );
        let mut stderr = io::stderr().lock();
        stderr.write_all(output.text.as_bytes())?;
        write!(stderr, "\nCommand failed with exit code {}\n", output.exit_code)?;
        writeln!(stderr, "Use --allow-nonzero to still attempt parsing.")?;
        return Ok(ExitCode::from(command_exit_status(output.exit_code)));
    }

    set_phase(&mut reporter, Phase::Parsing)?;
    break_status(&mut reporter)?;
    let context = RunContext::new(
        cli.cmd.as_str(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        std::env::current_dir()?.display().to_string(),
    );
    let run = parse_report(&output.text, context, &cli.parser_config());

    if let Some(path) = &cli.json_out {
        set_phase(&mut reporter, Phase::WritingSnapshot)?;
        break_status(&mut reporter)?;
        if let Some(baseline) = &cli.compare_to {
            tracing::warn!(
                component = "cli",
                operation = "compare",
                status = "ignored",
                baseline = %baseline.display(),
                "Baseline is not used when writing a snapshot"
            );
        }
        let written = write_snapshot(path, &run);
        clear_status(&mut reporter)?;
        written?;
        println!("{}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    set_phase(&mut reporter, Phase::PrintingCharts)?;
    clear_status(&mut reporter)?;

    if run.cases.is_empty() {
        println!("No benchmark cases parsed.");
        return Ok(ExitCode::SUCCESS);
    }

    let baseline = cli.compare_to.as_deref().map(Baseline::load).transpose()?;
    let options = ChartOptions::default().with_bar_width(cli.bar_width);
    print!("{}", render_charts(&run.cases, baseline.as_ref(), &options));
    Ok(ExitCode::SUCCESS)
}
