//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints test events to the console as they happen. Output is
//! colored when the terminal supports it, localized through `rust-i18n`, and
//! scaled by the resolved verbosity:
//!
//! - below 0: unknown issues, failed tests and the final summary only
//! - 0: additionally the run start, passed tests and known issues
//! - 1: additionally test starts, iteration boundaries and issue locations
//! - 2 and above: every line is prefixed with its iteration
//!
//! 此模块在事件发生时将其打印到控制台。终端支持时输出带颜色，
//! 通过 `rust-i18n` 本地化，并根据解析后的详细级别调整输出量。

use colored::*;
use std::collections::HashMap;
use std::env;
use std::io::{IsTerminal, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::core::models::{Event, EventContext, EventKind, Issue, TestId};
use crate::core::pipeline::EventRecorder;
use crate::infra::t;

/// Overrides whether symbols such as `✔` are printed (`1`/`true` or `0`/`false`).
pub const SYMBOLS_ENV_VAR: &str = "SUITE_RUNNER_SYMBOLS";

/// What the output terminal can render.
/// 输出终端能够渲染的内容。
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Emit ANSI colors. / 输出 ANSI 颜色。
    pub use_color: bool,
    /// Bits of color depth: 4, 8 or 24. / 颜色深度位数：4、8 或 24。
    pub color_depth: u8,
    /// Emit Unicode symbols instead of ASCII markers. / 输出 Unicode 符号而不是 ASCII 标记。
    pub use_symbols: bool,
}

impl TerminalCapabilities {
    /// Probes the environment and whether stderr is a terminal.
    pub fn detect() -> Self {
        Self::from_env(|name| env::var(name).ok(), std::io::stderr().is_terminal())
    }

    /// Derives capabilities from environment lookups.
    ///
    /// `NO_COLOR` (non-empty) or `TERM=dumb` disable color; `COLORTERM` of
    /// `truecolor`/`24bit` selects 24-bit color and a `TERM` containing
    /// `256color` selects 8-bit color. [`SYMBOLS_ENV_VAR`] overrides whether
    /// symbols are used, which otherwise follows `is_terminal`.
    pub fn from_env(var: impl Fn(&str) -> Option<String>, is_terminal: bool) -> Self {
        let term = var("TERM").unwrap_or_default();
        let no_color = var("NO_COLOR").is_some_and(|value| !value.is_empty());

        let color_depth = match var("COLORTERM").as_deref() {
            Some("truecolor") | Some("24bit") => 24,
            _ if term.contains("256color") => 8,
            _ => 4,
        };

        let use_symbols = match var(SYMBOLS_ENV_VAR).as_deref() {
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            _ => is_terminal,
        };

        Self {
            use_color: is_terminal && !no_color && term != "dumb",
            color_depth,
            use_symbols,
        }
    }

    /// No color, ASCII markers.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            color_depth: 4,
            use_symbols: false,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Tone {
    Neutral,
    Pass,
    Fail,
    Known,
}

impl Tone {
    fn symbol(self, capabilities: &TerminalCapabilities) -> &'static str {
        match (self, capabilities.use_symbols) {
            (Tone::Neutral, true) => "◇",
            (Tone::Pass, true) => "✔",
            (Tone::Fail, true) => "✘",
            (Tone::Known, true) => "⚠",
            (Tone::Neutral, false) => "[ ]",
            (Tone::Pass, false) => "[ok]",
            (Tone::Fail, false) => "[fail]",
            (Tone::Known, false) => "[known]",
        }
    }

    fn paint(self, text: &str, capabilities: &TerminalCapabilities) -> String {
        if !capabilities.use_color {
            return text.to_string();
        }
        match self {
            Tone::Neutral => text.normal().to_string(),
            Tone::Pass => text.green().to_string(),
            Tone::Fail => text.red().bold().to_string(),
            Tone::Known if capabilities.color_depth >= 8 => {
                text.truecolor(128, 128, 128).to_string()
            }
            Tone::Known => text.dimmed().to_string(),
        }
    }
}

#[derive(Default)]
struct Tally {
    started: Option<Instant>,
    issues: usize,
    known_issues: usize,
}

struct ConsoleState<W> {
    writer: W,
    run_started: Option<Instant>,
    tests: usize,
    failed_tests: usize,
    issues: usize,
    known_issues: usize,
    tallies: HashMap<TestId, Tally>,
}

/// Prints a human-readable account of a run.
pub struct ConsoleRecorder<W> {
    verbosity: i32,
    capabilities: TerminalCapabilities,
    state: Mutex<ConsoleState<W>>,
}

impl ConsoleRecorder<std::io::Stderr> {
    /// A recorder writing to stderr with detected terminal capabilities.
    pub fn stderr(verbosity: i32) -> Self {
        Self::new(std::io::stderr(), verbosity, TerminalCapabilities::detect())
    }
}

impl<W: Write + Send> ConsoleRecorder<W> {
    pub fn new(writer: W, verbosity: i32, capabilities: TerminalCapabilities) -> Self {
        Self {
            verbosity,
            capabilities,
            state: Mutex::new(ConsoleState {
                writer,
                run_started: None,
                tests: 0,
                failed_tests: 0,
                issues: 0,
                known_issues: 0,
                tallies: HashMap::new(),
            }),
        }
    }

    /// Returns the writer, e.g. to inspect buffered output.
    pub fn into_writer(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    fn line(&self, state: &mut ConsoleState<W>, tone: Tone, context: &EventContext, message: &str) {
        let symbol = tone.paint(tone.symbol(&self.capabilities), &self.capabilities);
        let prefix = match context.iteration {
            Some(iteration) if self.verbosity >= 2 => {
                format!("[{}] ", t!("console.iteration_prefix", index = iteration + 1))
            }
            _ => String::new(),
        };
        if let Err(error) = writeln!(state.writer, "{symbol} {prefix}{message}") {
            tracing::warn!(%error, "failed to write console output");
        }
    }

    fn describe_issue(&self, issue: &Issue) -> String {
        match &issue.source_location {
            Some(location) if self.verbosity >= 1 => format!("{} ({location})", issue.summary()),
            _ => issue.summary(),
        }
    }
}

fn test_name(context: &EventContext) -> String {
    context
        .test
        .as_ref()
        .map(TestId::name_path)
        .unwrap_or_else(|| t!("console.no_test").to_string())
}

impl<W: Write + Send> EventRecorder for ConsoleRecorder<W> {
    fn record(&self, event: &Event, context: &EventContext) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *state;
        let name = test_name(context);

        match &event.kind {
            EventKind::RunStarted => {
                state.run_started = Some(Instant::now());
                if self.verbosity >= 0 {
                    self.line(state, Tone::Neutral, context, &t!("console.run_started"));
                }
            }
            EventKind::IterationStarted { index } => {
                if self.verbosity >= 1 {
                    let message = t!("console.iteration_started", index = index + 1);
                    self.line(state, Tone::Neutral, context, &message);
                }
            }
            EventKind::TestStarted => {
                if let Some(test) = &context.test {
                    state.tallies.insert(
                        test.clone(),
                        Tally {
                            started: Some(Instant::now()),
                            ..Tally::default()
                        },
                    );
                }
                if self.verbosity >= 1 {
                    let message = t!("console.test_started", name = name);
                    self.line(state, Tone::Neutral, context, &message);
                }
            }
            EventKind::IssueRecorded { issue } => {
                let tally = context
                    .test
                    .as_ref()
                    .map(|test| state.tallies.entry(test.clone()).or_default());
                if issue.is_known {
                    if let Some(tally) = tally {
                        tally.known_issues += 1;
                    }
                    state.known_issues += 1;
                    if self.verbosity >= 0 {
                        let message = t!(
                            "console.known_issue_recorded",
                            name = name,
                            comment = self.describe_issue(issue)
                        );
                        self.line(state, Tone::Known, context, &message);
                    }
                } else {
                    if let Some(tally) = tally {
                        tally.issues += 1;
                    }
                    state.issues += 1;
                    let message = t!(
                        "console.issue_recorded",
                        name = name,
                        comment = self.describe_issue(issue)
                    );
                    self.line(state, Tone::Fail, context, &message);
                }
            }
            EventKind::TestEnded => {
                let tally = context
                    .test
                    .as_ref()
                    .and_then(|test| state.tallies.remove(test))
                    .unwrap_or_default();
                let seconds = format!(
                    "{:.3}",
                    tally.started.map(|s| s.elapsed().as_secs_f64()).unwrap_or_default()
                );
                state.tests += 1;

                if tally.issues > 0 {
                    state.failed_tests += 1;
                    let message = t!(
                        "console.test_failed",
                        name = name,
                        seconds = seconds,
                        count = tally.issues
                    );
                    self.line(state, Tone::Fail, context, &message);
                } else if self.verbosity >= 0 {
                    let message = if tally.known_issues > 0 {
                        t!(
                            "console.test_passed_with_known_issues",
                            name = name,
                            seconds = seconds,
                            count = tally.known_issues
                        )
                    } else {
                        t!("console.test_passed", name = name, seconds = seconds)
                    };
                    self.line(state, Tone::Pass, context, &message);
                }
            }
            EventKind::IterationEnded { index } => {
                if self.verbosity >= 1 {
                    let message = t!("console.iteration_ended", index = index + 1);
                    self.line(state, Tone::Neutral, context, &message);
                }
            }
            EventKind::RunEnded => {
                let seconds = format!(
                    "{:.3}",
                    state
                        .run_started
                        .map(|s| s.elapsed().as_secs_f64())
                        .unwrap_or_default()
                );
                let (tone, message) = if state.issues > 0 {
                    (
                        Tone::Fail,
                        t!(
                            "console.run_failed",
                            tests = state.tests,
                            failed = state.failed_tests,
                            issues = state.issues,
                            known = state.known_issues,
                            seconds = seconds
                        ),
                    )
                } else {
                    (
                        Tone::Pass,
                        t!(
                            "console.run_passed",
                            tests = state.tests,
                            known = state.known_issues,
                            seconds = seconds
                        ),
                    )
                };
                self.line(state, tone, context, &message);
            }
        }
    }
}
