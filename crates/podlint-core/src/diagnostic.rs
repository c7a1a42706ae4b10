//! # Diagnostics
//!
//! A [`Diagnostic`] records one validation failure: which field, on which
//! line, and what is wrong with it. Diagnostics are created by the leaf and
//! required-field checks, never mutated afterwards, and never removed.
//!
//! ## Rendering
//!
//! Each diagnostic renders as a single line. Line-addressable findings use
//! `<path>:<line> <field> <problem>`; a required field that never appeared
//! has no line to point at and renders as `<field> is required`.
//!
//! ## Ordering
//!
//! A [`Report`] keeps diagnostics in the order the checks fired, which is
//! document traversal order. It is never sorted by line or by kind.

use std::fmt;

use serde::Serialize;

/// Scalar type or node shape a field was expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    Int,
    String,
    Mapping,
    Sequence,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
        })
    }
}

/// What went wrong, with the data each kind of finding needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// A required key never appeared in its mapping.
    MissingRequiredField,
    /// A key is present but its value is empty.
    RequiredField,
    /// The value has the wrong scalar type or node shape.
    TypeMismatch { expected: ExpectedType },
    /// A string value fails its pattern.
    InvalidFormat { value: String },
    /// A value is outside its allowed enumeration.
    UnsupportedValue { value: String },
    /// A number falls outside its inclusive bounds.
    ValueOutOfRange,
    /// The input file could not be read.
    IoFailure { reason: String },
    /// The input is not well-formed YAML.
    ParseFailure { reason: String },
}

/// Flat classification of a [`Problem`], convenient for matching in callers
/// and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    MissingRequiredField,
    RequiredField,
    TypeMismatch,
    InvalidFormat,
    UnsupportedValue,
    ValueOutOfRange,
    IoFailure,
    ParseFailure,
}

impl Problem {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MissingRequiredField => DiagnosticKind::MissingRequiredField,
            Self::RequiredField => DiagnosticKind::RequiredField,
            Self::TypeMismatch { .. } => DiagnosticKind::TypeMismatch,
            Self::InvalidFormat { .. } => DiagnosticKind::InvalidFormat,
            Self::UnsupportedValue { .. } => DiagnosticKind::UnsupportedValue,
            Self::ValueOutOfRange => DiagnosticKind::ValueOutOfRange,
            Self::IoFailure { .. } => DiagnosticKind::IoFailure,
            Self::ParseFailure { .. } => DiagnosticKind::ParseFailure,
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Display path of the validated document.
    pub source: String,
    /// Field name the finding is about. Empty for boundary failures.
    pub field: String,
    /// 1-based source line, absent when the field never appeared.
    pub line: Option<usize>,
    #[serde(flatten)]
    pub problem: Problem,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        self.problem.kind()
    }

    /// Boundary failures abort a run before any field is examined.
    pub fn is_boundary_failure(&self) -> bool {
        matches!(
            self.problem,
            Problem::IoFailure { .. } | Problem::ParseFailure { .. }
        )
    }

    /// A diagnostic for a file that could not be read.
    pub fn io_failure(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            field: String::new(),
            line: None,
            problem: Problem::IoFailure {
                reason: reason.into(),
            },
        }
    }

    /// A diagnostic for text that is not well-formed YAML.
    pub fn parse_failure(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            field: String::new(),
            line: None,
            problem: Problem::ParseFailure {
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (source, field) = (&self.source, &self.field);
        let line = self.line.unwrap_or_default();
        match &self.problem {
            Problem::MissingRequiredField => write!(f, "{field} is required"),
            Problem::RequiredField => write!(f, "{source}:{line} {field} is required"),
            Problem::TypeMismatch { expected } => {
                write!(f, "{source}:{line} {field} must be {expected}")
            }
            Problem::InvalidFormat { value } => {
                write!(f, "{source}:{line} {field} has invalid format '{value}'")
            }
            Problem::UnsupportedValue { value } => {
                write!(f, "{source}:{line} {field} has unsupported value '{value}'")
            }
            Problem::ValueOutOfRange => write!(f, "{source}:{line} {field} value out of range"),
            Problem::IoFailure { reason } => write!(f, "cannot read file content: {reason}"),
            Problem::ParseFailure { reason } => {
                write!(f, "cannot unmarshal file content: {reason}")
            }
        }
    }
}

/// Ordered diagnostics produced by one validation run.
///
/// An empty report means the document is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Returns true if no check fired.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns a slice of all diagnostics in firing order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
