//! Reporter - ordered check results with run-scoped counters.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  record()  ┌──────────────────────┐  line()  ┌──────────┐
//! │ battery      │──────────► │ Report               │────────► │ LogSink  │
//! │ checks       │            │  results (ordered)   │          │ tracing, │
//! └──────────────┘            │  RunCounters         │          │ memory,  │
//!                             └──────────────────────┘          │ console  │
//!                                                               └──────────┘
//! ```
//!
//! Every result is written to the sink exactly once, when it is recorded.
//! The summary line reports the counters as they stand at that moment.

use std::fmt;

/// Verdict of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Expectation met
    Pass,
    /// Expectation violated
    Fail,
    /// Not automatable with confidence
    Info,
}

impl Outcome {
    /// PASS for `true`, FAIL for `false`
    #[must_use]
    pub const fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Tag used in report lines
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Info => "INFO",
        }
    }

    /// Sink level for lines with this outcome
    #[must_use]
    pub const fn level(self) -> LogLevel {
        match self {
            Self::Fail => LogLevel::Warn,
            Self::Pass | Self::Info => LogLevel::Info,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One evaluated check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Check name
    pub name: String,
    /// Verdict
    pub outcome: Outcome,
    /// Optional detail, e.g. `count=6`
    pub detail: Option<String>,
}

impl CheckResult {
    /// Create a result; an empty detail is treated as none
    #[must_use]
    pub fn new(name: impl Into<String>, outcome: Outcome, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            outcome,
            detail: detail.filter(|d| !d.is_empty()),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.outcome, self.name)?;
        if let Some(detail) = &self.detail {
            write!(f, " — {detail}")?;
        }
        Ok(())
    }
}

/// Tally of outcomes in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounters {
    /// PASS count
    pub pass: usize,
    /// FAIL count
    pub fail: usize,
    /// INFO count
    pub info: usize,
}

impl RunCounters {
    /// Count one outcome
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Info => self.info += 1,
        }
    }

    /// Total results counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pass + self.fail + self.info
    }
}

/// Level of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Regular output
    Info,
    /// Failures
    Warn,
}

/// Destination for report lines
pub trait LogSink {
    /// Write one line
    fn line(&mut self, level: LogLevel, text: &str);
}

/// Routes report lines to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn line(&mut self, level: LogLevel, text: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "chatprobe::report", "{text}"),
            LogLevel::Warn => tracing::warn!(target: "chatprobe::report", "{text}"),
        }
    }
}

/// Keeps report lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<(LogLevel, String)>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured lines with their levels
    #[must_use]
    pub fn entries(&self) -> &[(LogLevel, String)] {
        &self.lines
    }

    /// Captured line texts
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl LogSink for MemorySink {
    fn line(&mut self, level: LogLevel, text: &str) {
        self.lines.push((level, text.to_string()));
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn line(&mut self, level: LogLevel, text: &str) {
        (**self).line(level, text);
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn line(&mut self, level: LogLevel, text: &str) {
        (**self).line(level, text);
    }
}

/// Ordered results and counters for one battery run
#[derive(Debug)]
pub struct Report<S: LogSink> {
    battery: String,
    results: Vec<CheckResult>,
    counters: RunCounters,
    summary: Option<RunCounters>,
    sink: S,
}

impl<S: LogSink> Report<S> {
    /// Start an empty report for the named battery
    pub fn new(battery: impl Into<String>, sink: S) -> Self {
        Self {
            battery: battery.into(),
            results: Vec::new(),
            counters: RunCounters::default(),
            summary: None,
            sink,
        }
    }

    /// Battery name used in the summary line
    #[must_use]
    pub fn battery(&self) -> &str {
        &self.battery
    }

    /// Write a section header: a blank line, then `=== title ===`
    pub fn section(&mut self, title: &str) {
        self.sink.line(LogLevel::Info, "");
        self.sink.line(LogLevel::Info, &format!("=== {title} ==="));
    }

    /// Record a result and write its line
    pub fn record(&mut self, result: CheckResult) {
        self.sink.line(result.outcome.level(), &result.to_string());
        self.counters.record(result.outcome);
        self.results.push(result);
    }

    /// Record PASS/FAIL from a condition
    pub fn check(&mut self, name: &str, ok: bool, detail: Option<String>) {
        self.record(CheckResult::new(name, Outcome::from_bool(ok), detail));
    }

    /// Record an INFO result
    pub fn info(&mut self, name: &str, detail: &str) {
        self.record(CheckResult::new(
            name,
            Outcome::Info,
            Some(detail.to_string()),
        ));
    }

    /// Write the summary line and remember the counts it showed
    pub fn summarize(&mut self) -> RunCounters {
        let c = self.counters;
        let line = format!(
            "[SUMMARY] {} — pass={} fail={} info={}",
            self.battery, c.pass, c.fail, c.info
        );
        self.sink.line(LogLevel::Info, &line);
        self.summary = Some(c);
        c
    }

    /// Results in evaluation order
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Result by check name
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Current counters
    #[must_use]
    pub const fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Counters as printed in the summary line, if one was written
    #[must_use]
    pub const fn summary(&self) -> Option<RunCounters> {
        self.summary
    }

    /// The sink
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the report, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}
