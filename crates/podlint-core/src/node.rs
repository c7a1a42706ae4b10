//! # Document Nodes
//!
//! The generic tree the loader produces and the validators walk. A node is
//! a scalar, a sequence, or a mapping, plus the line it started on.
//!
//! Mapping entries keep document order and keep duplicates; the validators
//! rely on that to report findings in the order the author wrote them.

use std::fmt;

/// Resolved tag of a scalar node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarTag {
    /// `!!null`: `~`, `null`, or an empty value.
    Null,
    /// `!!bool`
    Bool,
    /// `!!int`
    Int,
    /// `!!float`
    Float,
    /// `!!str`
    Str,
    /// Any explicit tag outside the core schema, kept verbatim.
    Custom(String),
}

impl fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("!!null"),
            Self::Bool => f.write_str("!!bool"),
            Self::Int => f.write_str("!!int"),
            Self::Float => f.write_str("!!float"),
            Self::Str => f.write_str("!!str"),
            Self::Custom(tag) => f.write_str(tag),
        }
    }
}

/// Shape of a node and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A scalar with its literal text and resolved tag.
    Scalar { value: String, tag: ScalarTag },
    /// Ordered child nodes.
    Sequence(Vec<Node>),
    /// Ordered `(key, value)` pairs.
    Mapping(Vec<(Node, Node)>),
}

/// A YAML node with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub line: usize,
}

impl Node {
    /// Build a scalar node.
    pub fn scalar(value: impl Into<String>, tag: ScalarTag, line: usize) -> Self {
        Self {
            kind: NodeKind::Scalar {
                value: value.into(),
                tag,
            },
            line,
        }
    }

    /// Build a sequence node.
    pub fn sequence(items: Vec<Node>, line: usize) -> Self {
        Self {
            kind: NodeKind::Sequence(items),
            line,
        }
    }

    /// Build a mapping node.
    pub fn mapping(entries: Vec<(Node, Node)>, line: usize) -> Self {
        Self {
            kind: NodeKind::Mapping(entries),
            line,
        }
    }

    /// Literal text of a scalar; empty for sequences and mappings.
    pub fn text(&self) -> &str {
        match &self.kind {
            NodeKind::Scalar { value, .. } => value,
            _ => "",
        }
    }

    /// Resolved tag of a scalar, `None` for collections.
    pub fn tag(&self) -> Option<&ScalarTag> {
        match &self.kind {
            NodeKind::Scalar { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar { .. })
    }

    /// Mapping entries, if this node is a mapping.
    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Sequence items, if this node is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up the first value under `key` in a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.text() == key)
            .map(|(_, v)| v)
    }

    /// Short name of the node's shape, for log output.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Scalar { .. } => "scalar",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
        }
    }
}
