//! # Error Types
//!
//! Boundary failures that stop a run before any field is examined. Field
//! problems are never errors; they are [`Diagnostic`](crate::Diagnostic)s.

use thiserror::Error;

/// The document could not be obtained as a node tree.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The text is not well-formed YAML.
    #[error("{reason}")]
    Parse {
        /// Parser message, including the position it stopped at.
        reason: String,
    },
}
