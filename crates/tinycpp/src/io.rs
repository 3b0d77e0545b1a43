//! `cout`/`cin` I/O abstraction: decoupling output from `std::io` directly
//! lets the same evaluator run unmodified under a test harness that
//! captures `cout` text instead of writing real stdout.

use std::io::{self, BufRead, Write as _};

use crate::exception::{number_in_error, TinyResult};

/// Sink for `cout` output. One call per chained `<<` operand; the
/// statement interpreter writes each operand back-to-back with no
/// separator.
pub trait CoutWriter {
    fn write_str(&mut self, text: &str) -> TinyResult<()>;
}

/// Source for `cin` input, one declared-type read per target. A single
/// line read per value is an implementation choice; any byte source that
/// can parse the declared type satisfies the trait equally well.
pub trait CinReader {
    fn read_int(&mut self) -> TinyResult<i64>;
    fn read_double(&mut self) -> TinyResult<f64>;
    fn read_line_string(&mut self) -> TinyResult<String>;
}

/// Default `CoutWriter` that writes straight to stdout.
#[derive(Debug, Default)]
pub struct StdCout;

impl CoutWriter for StdCout {
    fn write_str(&mut self, text: &str) -> TinyResult<()> {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
        Ok(())
    }
}

/// Default `CinReader` that reads from stdin, one line per call.
#[derive(Debug, Default)]
pub struct StdCin;

impl StdCin {
    fn next_line(&mut self) -> String {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        line.trim_end_matches(['\n', '\r']).to_string()
    }
}

impl CinReader for StdCin {
    fn read_int(&mut self) -> TinyResult<i64> {
        let line = self.next_line();
        line.trim()
            .parse::<i64>()
            .map_err(|_| number_in_error(format!("could not parse '{line}' as int")))
    }

    fn read_double(&mut self) -> TinyResult<f64> {
        let line = self.next_line();
        line.trim()
            .parse::<f64>()
            .map_err(|_| number_in_error(format!("could not parse '{line}' as double")))
    }

    fn read_line_string(&mut self) -> TinyResult<String> {
        Ok(self.next_line())
    }
}

/// Collects all `cout` output into an in-memory string.
///
/// Used throughout the test suite in place of real stdout.
#[derive(Debug, Default)]
pub struct CollectingCout(pub String);

impl CollectingCout {
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }
}

impl CoutWriter for CollectingCout {
    fn write_str(&mut self, text: &str) -> TinyResult<()> {
        self.0.push_str(text);
        Ok(())
    }
}

/// Supplies canned `cin` input from a fixed list of lines, in order.
///
/// Used in tests to feed deterministic input without touching real stdin.
#[derive(Debug, Default)]
pub struct ScriptedCin {
    lines: std::collections::VecDeque<String>,
}

impl ScriptedCin {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    fn next_line(&mut self) -> String {
        self.lines.pop_front().unwrap_or_default()
    }
}

impl CinReader for ScriptedCin {
    fn read_int(&mut self) -> TinyResult<i64> {
        let line = self.next_line();
        line.trim()
            .parse::<i64>()
            .map_err(|_| number_in_error(format!("could not parse '{line}' as int")))
    }

    fn read_double(&mut self) -> TinyResult<f64> {
        let line = self.next_line();
        line.trim()
            .parse::<f64>()
            .map_err(|_| number_in_error(format!("could not parse '{line}' as double")))
    }

    fn read_line_string(&mut self) -> TinyResult<String> {
        Ok(self.next_line())
    }
}
