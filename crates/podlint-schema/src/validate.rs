//! # Validation Runs
//!
//! Entry points that own one run each: they allocate a fresh
//! [`ValidationContext`], walk every document, and return the drained
//! [`Report`].
//!
//! Boundary failures (unreadable file, malformed YAML) end the run with a
//! single diagnostic; no field is examined after one.

use std::path::Path;

use podlint_core::{loader, Diagnostic, LoadError, Node, Report};

use crate::context::ValidationContext;
use crate::rules::validate_pod;

/// Validate a single document tree.
pub fn validate_document(doc: &Node, source: &str) -> Report {
    validate_documents(std::slice::from_ref(doc), source)
}

/// Validate every document of a stream, concatenating diagnostics in
/// stream order.
///
/// An empty stream is validated as an empty document, so it reports every
/// required root field as missing.
pub fn validate_documents(docs: &[Node], source: &str) -> Report {
    let mut ctx = ValidationContext::new(source);
    if docs.is_empty() {
        tracing::debug!(source, "empty stream; validating as an empty document");
        validate_pod(&mut ctx, &Node::mapping(Vec::new(), 1));
    }
    for (index, doc) in docs.iter().enumerate() {
        tracing::debug!(source, document = index, line = doc.line, "validating document");
        validate_pod(&mut ctx, doc);
    }
    let report = ctx.into_report();
    tracing::debug!(source, diagnostics = report.len(), "validation finished");
    report
}

/// Parse YAML text and validate it.
pub fn validate_str(content: &str, source: &str) -> Report {
    match loader::parse_str(content) {
        Ok(docs) => validate_documents(&docs, source),
        Err(e) => boundary_failure(source, e),
    }
}

/// Read a file, parse it, and validate it. `source` is the path shown in
/// diagnostics, which need not be `path` itself.
pub fn validate_file(path: &Path, source: &str) -> Report {
    tracing::debug!(path = %path.display(), source, "loading document");
    match loader::load_file(path) {
        Ok(docs) => validate_documents(&docs, source),
        Err(e) => boundary_failure(source, e),
    }
}

fn boundary_failure(source: &str, err: LoadError) -> Report {
    tracing::warn!(source, error = %err, "document could not be loaded");
    let diagnostic = match err {
        LoadError::Io { .. } => Diagnostic::io_failure(source, err.to_string()),
        LoadError::Parse { reason } => Diagnostic::parse_failure(source, reason),
    };
    Report::new(vec![diagnostic])
}

#[cfg(test)]
mod tests {
    use super::*;
    use podlint_core::DiagnosticKind;

    #[test]
    fn single_tree_is_validated_like_a_one_document_stream() {
        let docs = loader::parse_str("apiVersion: v1\nkind: Job\n").unwrap();
        let report = validate_document(&docs[0], "job.yaml");
        assert_eq!(report, validate_documents(&docs, "job.yaml"));
        let fields: Vec<&str> = report.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["kind", "metadata", "spec"]);
    }

    #[test]
    fn empty_stream_reports_all_root_fields() {
        let report = validate_str("", "pod.yaml");
        let rendered: Vec<String> = report.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            rendered,
            [
                "apiVersion is required",
                "kind is required",
                "metadata is required",
                "spec is required",
            ]
        );
    }

    #[test]
    fn scalar_root_is_a_type_mismatch() {
        let report = validate_str("just a string\n", "pod.yaml");
        assert_eq!(report.len(), 1);
        assert_eq!(report.diagnostics()[0].to_string(), "pod.yaml:1 (root) must be mapping");
    }

    #[test]
    fn malformed_yaml_is_a_single_parse_failure() {
        let report = validate_str("apiVersion: v1\nkind: [Pod\n", "pod.yaml");
        assert_eq!(report.len(), 1);
        assert_eq!(report.diagnostics()[0].kind(), DiagnosticKind::ParseFailure);
    }

    #[test]
    fn unreadable_file_is_a_single_io_failure() {
        let report = validate_file(Path::new("/nonexistent/podlint/pod.yaml"), "pod.yaml");
        assert_eq!(report.len(), 1);
        assert!(report.diagnostics()[0].is_boundary_failure());
        assert_eq!(report.diagnostics()[0].kind(), DiagnosticKind::IoFailure);
    }

    #[test]
    fn documents_are_validated_in_stream_order() {
        let report = validate_str("kind: Pod\n---\napiVersion: v1\n", "pod.yaml");
        let fields: Vec<&str> = report.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            ["apiVersion", "metadata", "spec", "kind", "metadata", "spec"]
        );
    }
}
