//! # podlint-schema: Pod Manifest Validation
//!
//! A one-pass, read-only linter for Pod manifests. It walks a parsed
//! document tree against one hard-coded schema and collects every problem
//! it finds as a [`Diagnostic`](podlint_core::Diagnostic).
//!
//! ## Structure
//!
//! - [`walker`]: the generic primitive: walk one mapping against one
//!   [`MappingRule`], dispatch known keys, report missing required keys.
//! - [`rules`]: the Pod schema as static rule tables, from the document
//!   root down to resource declarations.
//! - [`checks`]: leaf checks: integer ranges, patterns, enumerations.
//! - [`context`]: per-run state. Every run owns its accumulator, so
//!   validations are reentrant and can run in parallel.
//! - [`validate`]: run entry points for trees, strings and files.
//!
//! ## Policy
//!
//! - Validation never stops early. Every sibling is examined, so one run
//!   surfaces every problem.
//! - Unknown keys are tolerated without a diagnostic.
//! - Diagnostics come out in document traversal order, never sorted.

pub mod checks;
pub mod context;
pub mod rules;
pub mod validate;
pub mod walker;

pub use context::ValidationContext;
pub use validate::{validate_document, validate_documents, validate_file, validate_str};
pub use walker::{walk_mapping, walk_sequence, Field, FieldCheck, ItemCheck, MappingRule};
