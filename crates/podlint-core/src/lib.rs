//! # podlint-core: Foundational Types for podlint
//!
//! This crate is the leaf of the podlint workspace. It defines the data the
//! validation engine consumes and produces, and nothing else:
//!
//! - [`Node`]: an immutable, line-tracking YAML document tree. Every node
//!   carries the 1-based source line it came from and every scalar carries
//!   its resolved tag (`int`, `str`, ...), so validators can report type
//!   mismatches the way the YAML author sees them.
//! - [`Diagnostic`]: one validation finding. Diagnostics are values, not
//!   errors: a run collects all of them and never stops at the first.
//! - [`loader`]: turns YAML text into one [`Node`] tree per document.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `podlint-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Nodes are never mutated after the loader builds them.

pub mod diagnostic;
pub mod error;
pub mod loader;
pub mod node;

pub use diagnostic::{Diagnostic, DiagnosticKind, ExpectedType, Problem, Report};
pub use error::LoadError;
pub use loader::{load_file, parse_str};
pub use node::{Node, NodeKind, ScalarTag};
