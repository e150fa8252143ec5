//! # Console Reporter
//!
//! Report lines go to stdout, diagnostics to stderr. Diagnostic lines
//! containing the suppression token (`Warning` by default) are dropped,
//! which keeps noisy third-party warnings out of failure output.

use std::io::{self, Stderr, Stdout, Write};

/// Writes report and diagnostic lines.
#[derive(Debug)]
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    suppress: Option<String>,
    suppressed: usize,
}

impl Reporter<Stdout, Stderr> {
    /// Reporter on the process's stdout and stderr.
    pub fn stdio(suppress: Option<&str>) -> Self {
        Self::new(io::stdout(), io::stderr(), suppress)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, suppress: Option<&str>) -> Self {
        Self {
            out,
            err,
            suppress: suppress.filter(|t| !t.is_empty()).map(str::to_string),
            suppressed: 0,
        }
    }

    /// Write a report line.
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    /// Write a diagnostic line unless it contains the suppression token.
    pub fn error(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        let text = text.as_ref();
        if let Some(token) = &self.suppress {
            if text.contains(token.as_str()) {
                self.suppressed += 1;
                return Ok(());
            }
        }
        writeln!(self.err, "{text}")
    }

    /// How many diagnostic lines were dropped.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    /// Consume the reporter, returning its writers.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}
