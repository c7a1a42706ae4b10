//! # Validation Context
//!
//! Per-run state: the display path of the document and the diagnostics
//! accumulator. A fresh context is created for every run and handed down
//! by `&mut` to every validator, so runs never share state and can execute
//! concurrently on different inputs.
//!
//! The accumulator is append-only. The constructors below are the only way
//! validators create diagnostics, which keeps the field/line conventions in
//! one place.

use podlint_core::{Diagnostic, ExpectedType, Problem, Report};

/// State for one validation run.
#[derive(Debug)]
pub struct ValidationContext {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationContext {
    /// Start a run for the document displayed as `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics recorded so far, in firing order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Finish the run.
    pub fn into_report(self) -> Report {
        Report::new(self.diagnostics)
    }

    fn push(&mut self, field: &str, line: Option<usize>, problem: Problem) {
        tracing::trace!(field, ?line, kind = ?problem.kind(), "diagnostic");
        self.diagnostics.push(Diagnostic {
            source: self.source.clone(),
            field: field.to_string(),
            line,
            problem,
        });
    }

    /// A required key never appeared. There is no line to point at.
    pub fn missing_required(&mut self, field: &str) {
        self.push(field, None, Problem::MissingRequiredField);
    }

    /// A key is present but its value is empty.
    pub fn required(&mut self, field: &str, line: usize) {
        self.push(field, Some(line), Problem::RequiredField);
    }

    pub fn type_mismatch(&mut self, field: &str, expected: ExpectedType, line: usize) {
        self.push(field, Some(line), Problem::TypeMismatch { expected });
    }

    pub fn invalid_format(&mut self, field: &str, value: &str, line: usize) {
        self.push(
            field,
            Some(line),
            Problem::InvalidFormat {
                value: value.to_string(),
            },
        );
    }

    pub fn unsupported_value(&mut self, field: &str, value: &str, line: usize) {
        self.push(
            field,
            Some(line),
            Problem::UnsupportedValue {
                value: value.to_string(),
            },
        );
    }

    pub fn out_of_range(&mut self, field: &str, line: usize) {
        self.push(field, Some(line), Problem::ValueOutOfRange);
    }
}
