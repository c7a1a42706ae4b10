//! # podlint-cli: Command-Line Front End
//!
//! Provides the `podlint` binary:
//!
//! ```bash
//! podlint pod.yaml
//! podlint --format json --full-path deploy/pod.yaml
//! podlint --config podlint.yaml -vv pod.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing and output formatting live here; validation lives in
//!   `podlint-schema`.
//! - Diagnostics go to stdout, logs to stderr.

pub mod config;
pub mod validate;
