//! # Suite Runner
//!
//! Runs an ordered list of named checks. Each check is independent: a
//! failure, panic, or timeout is recorded and the runner moves on to the
//! next one.
//!
//! Every check runs on its own worker thread so the runner can stop
//! waiting after the configured timeout. A worker that overruns is
//! abandoned, not cancelled; its eventual result is discarded.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

type CheckFn = Box<dyn FnOnce() -> Result<(), String> + Send + 'static>;

struct Check {
    name: String,
    run: CheckFn,
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed(String),
    TimedOut,
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASS"),
            Outcome::Failed(_) => write!(f, "FAIL"),
            Outcome::TimedOut => write!(f, "TIMEOUT"),
        }
    }
}

/// A finished check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

/// All results of a suite run, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub results: Vec<CheckResult>,
}

impl SuiteReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Checks that failed or timed out.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.outcome.is_passed())
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

/// An ordered collection of named checks.
pub struct Suite {
    name: String,
    checks: Vec<Check>,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.checks.iter().map(|c| c.name.as_str()).collect();
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("checks", &names)
            .finish()
    }
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    /// Register a check. Checks run in registration order.
    pub fn add<F>(&mut self, name: impl Into<String>, run: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), String> + Send + 'static,
    {
        self.checks.push(Check {
            name: name.into(),
            run: Box::new(run),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check, waiting at most `timeout` for each.
    ///
    /// `None` waits indefinitely.
    pub fn run(self, timeout: Option<Duration>) -> SuiteReport {
        let mut results = Vec::with_capacity(self.checks.len());

        for (index, check) in self.checks.into_iter().enumerate() {
            let started = Instant::now();
            let outcome = run_one(index, &check.name, check.run, timeout);
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &outcome {
                Outcome::Passed => {
                    tracing::debug!(check = %check.name, elapsed_ms, "check passed");
                }
                Outcome::Failed(reason) => {
                    tracing::info!(check = %check.name, %reason, "check failed");
                }
                Outcome::TimedOut => {
                    tracing::warn!(check = %check.name, timeout = ?timeout, "check timed out");
                }
            }

            results.push(CheckResult {
                name: check.name,
                outcome,
                elapsed_ms,
            });
        }

        SuiteReport {
            suite: self.name,
            results,
        }
    }
}

fn run_one(index: usize, name: &str, run: CheckFn, timeout: Option<Duration>) -> Outcome {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name(format!("skt-check-{index}"))
        .spawn(move || {
            // The receiver is gone if the runner already gave up on us.
            let _ = tx.send(run());
        });
    if let Err(e) = spawned {
        return Outcome::Failed(format!("cannot start check '{name}': {e}"));
    }

    let received = match timeout {
        Some(limit) => rx.recv_timeout(limit),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match received {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(reason)) => Outcome::Failed(reason),
        Err(RecvTimeoutError::Timeout) => Outcome::TimedOut,
        Err(RecvTimeoutError::Disconnected) => Outcome::Failed("check panicked".to_string()),
    }
}
