use std::{cell::RefCell, fmt};

/// Pipeline stage a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Parser,
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// A phase-tagged, severity-tagged, position-tagged message.
///
/// `line` and `column` are 1-based; `(0, 0)` marks a phase-global entry with
/// no useful source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Line {line}, Column {column}] {severity}: {message}",
            line = self.line,
            column = self.column,
            severity = self.severity,
            message = self.message
        )
    }
}

/// Collects the diagnostics of a single pipeline phase.
///
/// The reporter is bound to its phase at construction so call sites never
/// pass the phase around. Reporting goes through a shared reference; the
/// inner list is the only thing ever borrowed mutably.
pub struct ErrorReporter {
    phase: Phase,
    entries: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Records an error at the given 1-based position. Position `(0, 0)`
    /// means the diagnostic is phase-global.
    pub fn report(&self, line: u32, column: u32, message: impl ToString) {
        self.push(line, column, message, Severity::Error);
    }

    pub fn warn(&self, line: u32, column: u32, message: impl ToString) {
        self.push(line, column, message, Severity::Warning);
    }

    fn push(&self, line: u32, column: u32, message: impl ToString, severity: Severity) {
        self.entries.borrow_mut().push(Diagnostic {
            phase: self.phase,
            severity,
            line,
            column,
            message: message.to_string(),
        });
    }

    /// True when at least one entry has `Severity::Error`.
    pub fn has_errors(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Snapshot of the entries, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.entries.into_inner()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        for entry in entries.iter() {
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}
