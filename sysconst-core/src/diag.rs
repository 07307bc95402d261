//! Diagnostic reporting.
//!
//! Operations report every problem through an [`ErrorHandler`] and keep
//! going where the error policy allows; the final `Result` only says whether
//! the call as a whole succeeded. Handlers are borrowed mutably, so each call
//! owns its reporting state.

use crate::ast::Pos;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// Receives positioned diagnostics.
pub trait ErrorHandler {
    fn report(&mut self, pos: &Pos, msg: &str);
}

impl<F> ErrorHandler for F
where
    F: FnMut(&Pos, &str),
{
    fn report(&mut self, pos: &Pos, msg: &str) {
        self(pos, msg)
    }
}

/// Default sink: logs each diagnostic as a tracing error event.
///
/// Used by the aggregator when the caller supplies no handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ErrorHandler for LoggingHandler {
    fn report(&mut self, pos: &Pos, msg: &str) {
        error!(pos = %pos, detail = %msg);
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub pos: Pos,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.message)
    }
}

/// Collects diagnostics for later inspection or printing.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics whose message contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.items
            .iter()
            .filter(|d| d.message.contains(needle))
            .count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl ErrorHandler for Diagnostics {
    fn report(&mut self, pos: &Pos, msg: &str) {
        self.items.push(Diagnostic {
            pos: pos.clone(),
            message: msg.to_string(),
        });
    }
}

/// Forwards to an inner handler and counts what passes through.
pub(crate) struct Counting<'a> {
    inner: &'a mut dyn ErrorHandler,
    errors: usize,
}

impl<'a> Counting<'a> {
    pub(crate) fn new(inner: &'a mut dyn ErrorHandler) -> Self {
        Self { inner, errors: 0 }
    }

    pub(crate) fn errors(&self) -> usize {
        self.errors
    }
}

impl ErrorHandler for Counting<'_> {
    fn report(&mut self, pos: &Pos, msg: &str) {
        self.errors += 1;
        self.inner.report(pos, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_handler() {
        let mut seen = Vec::new();
        {
            let mut eh = |pos: &Pos, msg: &str| seen.push(format!("{}: {}", pos, msg));
            eh.report(&Pos::new("a.const", 2, 0), "expect '='");
        }
        assert_eq!(seen, vec!["a.const:2: expect '='"]);
    }

    #[test]
    fn test_counting_forwards() {
        let mut diags = Diagnostics::new();
        let mut counting = Counting::new(&mut diags);
        counting.report(&Pos::default(), "one");
        counting.report(&Pos::default(), "two");
        assert_eq!(counting.errors(), 2);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.count_matching("one"), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            pos: Pos::new("sys.txt", 4, 1),
            message: "duplicate include \"x.h\"".to_string(),
        };
        assert_eq!(d.to_string(), "sys.txt:4:1: duplicate include \"x.h\"");
    }
}
