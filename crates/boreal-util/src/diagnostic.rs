//! Diagnostic collection shared by every pipeline stage.
//!
//! Each component (Lexer, Parser, Semantic Actions) appends to the same
//! [`Handler`] so the driver can harvest one ordered, source-order list at
//! the end of the pass (§5: diagnostics are appended in source order
//! because the whole pipeline is strictly left-to-right), while still being
//! able to split them back out by [`Origin`] for callers that want
//! `lexicalErrors`/`syntaxErrors`/`semanticErrors` as separate lists (§6).

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// Severity of a diagnostic (§6): error for lexical, syntactic, and type
/// errors; warning is reserved for optional checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// Which component raised the diagnostic. Exists purely so a shared
/// [`Handler`] can still report `Lexer.errors` / `Parser.errors` /
/// `SemanticActions.errors` as separate lists when callers want them split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Lexer,
    Parser,
    Semantic,
}

/// A short, stable identifier for a diagnostic message, e.g. `E-LEX-003`.
/// Useful for golden-file tests and for an editor to look up a fix-it by
/// code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode(pub &'static str);

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub origin: Origin,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
}

impl Diagnostic {
    pub fn error(origin: Origin, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            origin,
            message: message.into(),
            span,
            code: None,
        }
    }

    pub fn warning(origin: Origin, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            origin,
            message: message.into(),
            span,
            code: None,
        }
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// The simplified `{severity, message, position, line, column, length}`
    /// shape spec §6 names as the error record external consumers see.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            severity: self.level,
            message: self.message.clone(),
            position: self.span.start,
            line: self.span.line,
            column: self.span.column,
            length: self.span.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorRecord {
    pub severity: Level,
    pub message: String,
    pub position: usize,
    pub line: u32,
    pub column: u32,
    pub length: usize,
}

/// Append-only diagnostic sink. Not `Sync`: spec §5 calls the whole pipeline
/// single-threaded and cooperative, so there is no need to pay for interior
/// synchronisation the way a multi-threaded compiler's handler would.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// All diagnostics in emission order (which is source order, per the
    /// single left-to-right pass guarantee).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn by_origin(&self, origin: Origin) -> Vec<Diagnostic> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.origin == origin)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_tracks_error_count_but_not_warnings() {
        let h = Handler::new();
        h.emit(Diagnostic::error(Origin::Lexer, "bad char", Span::DUMMY));
        h.emit(Diagnostic::warning(Origin::Semantic, "unused", Span::DUMMY));
        assert!(h.has_errors());
        assert_eq!(h.error_count(), 1);
        assert_eq!(h.diagnostics().len(), 2);
    }

    #[test]
    fn by_origin_splits_the_shared_list() {
        let h = Handler::new();
        h.emit(Diagnostic::error(Origin::Lexer, "a", Span::DUMMY));
        h.emit(Diagnostic::error(Origin::Parser, "b", Span::DUMMY));
        h.emit(Diagnostic::error(Origin::Semantic, "c", Span::DUMMY));
        assert_eq!(h.by_origin(Origin::Lexer).len(), 1);
        assert_eq!(h.by_origin(Origin::Parser).len(), 1);
        assert_eq!(h.by_origin(Origin::Semantic).len(), 1);
    }
}
