//! # YAML Loader
//!
//! Builds [`Node`] trees from YAML text, one tree per document in the
//! stream. `yaml-rust2`'s event parser supplies the structure and the source
//! marks; this module resolves scalar tags and keeps the line numbers.
//!
//! ## Tag Resolution
//!
//! Plain scalars are resolved with the YAML 1.2 core schema (null, bool,
//! int, float, otherwise string). Quoted and block scalars are always
//! strings. An explicit `!!` tag wins over resolution, so `!!int "80"` is an
//! integer and `!!str 80` is a string.
//!
//! Null scalars carry empty text: `name:`, `name: ~` and `name: null` all
//! look empty to the validators.
//!
//! Aliases are expanded to a copy of the anchored node, so the result is
//! always a tree. Expansion is capped at `MAX_ALIAS_NODES` copied nodes;
//! a stream that needs more is rejected as a parse error.
//!
//! ## Lines of Empty Values
//!
//! The parser marks an implicit empty value at the token that follows it,
//! which may sit on a later line. A null value is therefore placed on the
//! line of the key it belongs to, and a null document root on the line of
//! its document start.

use std::collections::HashMap;
use std::path::Path;

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::error::LoadError;
use crate::node::{Node, NodeKind, ScalarTag};

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Upper bound on the nodes that alias expansion may copy into one stream.
const MAX_ALIAS_NODES: usize = 10_000;

/// Parse a YAML stream into one node tree per document, in stream order.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the text is not well-formed YAML.
pub fn parse_str(content: &str) -> Result<Vec<Node>, LoadError> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(content.chars());
    parser
        .load(&mut builder, true)
        .map_err(|e| LoadError::Parse {
            reason: e.to_string(),
        })?;
    if builder.alias_budget_exceeded {
        return Err(LoadError::Parse {
            reason: format!("alias expansion exceeds {MAX_ALIAS_NODES} nodes"),
        });
    }
    Ok(builder.documents)
}

/// Read a file and parse it with [`parse_str`].
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Parse`] if its content is not well-formed YAML.
pub fn load_file(path: &Path) -> Result<Vec<Node>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&content)
}

/// A collection that is still receiving children.
enum Frame {
    Sequence {
        items: Vec<Node>,
        line: usize,
        anchor: usize,
    },
    Mapping {
        entries: Vec<(Node, Node)>,
        pending_key: Option<Node>,
        line: usize,
        anchor: usize,
    },
}

#[derive(Default)]
struct TreeBuilder {
    documents: Vec<Node>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
    document_line: Option<usize>,
    alias_nodes: usize,
    alias_budget_exceeded: bool,
}

impl TreeBuilder {
    /// Attach a finished node to the innermost open collection, or close a
    /// document if no collection is open.
    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => *pending_key = Some(node),
                Some(key) => entries.push((key, node)),
            },
        }
    }

    /// Line for a null scalar: its key's line inside a mapping, the
    /// document start for a bare root, otherwise where the parser marked it.
    fn null_line(&self, marked: usize) -> usize {
        match self.stack.last() {
            Some(Frame::Mapping {
                pending_key: Some(key),
                ..
            }) => key.line,
            None => self.document_line.unwrap_or(marked),
            Some(_) => marked,
        }
    }

    /// Copy the anchored node for an alias, charging its size against
    /// `MAX_ALIAS_NODES`.
    fn expand_alias(&mut self, id: usize, line: usize) -> Option<Node> {
        let anchored = self.anchors.get(&id)?;
        self.alias_nodes = self.alias_nodes.saturating_add(node_count(anchored));
        if self.alias_nodes > MAX_ALIAS_NODES {
            return None;
        }
        Some(Node {
            line,
            ..anchored.clone()
        })
    }

    fn remember(&mut self, anchor: usize, node: &Node) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        if self.alias_budget_exceeded {
            return;
        }
        let line = mark.line();
        match ev {
            Event::DocumentStart => self.document_line = Some(line),
            Event::DocumentEnd => self.document_line = None,
            Event::Scalar(value, style, anchor, tag) => {
                let tag = resolve_scalar_tag(&value, &style, tag.as_ref());
                let node = if tag == ScalarTag::Null {
                    Node::scalar(String::new(), tag, self.null_line(line))
                } else {
                    Node::scalar(value, tag, line)
                };
                self.remember(anchor, &node);
                self.attach(node);
            }
            Event::SequenceStart(anchor, _) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                line,
                anchor,
            }),
            Event::MappingStart(anchor, _) => self.stack.push(Frame::Mapping {
                entries: Vec::new(),
                pending_key: None,
                line,
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                let (node, anchor) = match self.stack.pop() {
                    Some(Frame::Sequence {
                        items,
                        line,
                        anchor,
                    }) => (Node::sequence(items, line), anchor),
                    Some(Frame::Mapping {
                        entries,
                        line,
                        anchor,
                        ..
                    }) => (Node::mapping(entries, line), anchor),
                    None => return,
                };
                self.remember(anchor, &node);
                self.attach(node);
            }
            Event::Alias(id) => {
                if !self.anchors.contains_key(&id) {
                    // The parser rejects unknown anchors; this only keeps
                    // the tree shape intact.
                    self.attach(Node::scalar("", ScalarTag::Null, line));
                    return;
                }
                match self.expand_alias(id, line) {
                    Some(node) => self.attach(node),
                    None => {
                        self.alias_budget_exceeded = true;
                        self.stack.clear();
                    }
                }
            }
            _ => {}
        }
    }
}

fn node_count(node: &Node) -> usize {
    match &node.kind {
        NodeKind::Scalar { .. } => 1,
        NodeKind::Sequence(items) => 1 + items.iter().map(node_count).sum::<usize>(),
        NodeKind::Mapping(entries) => {
            1 + entries
                .iter()
                .map(|(k, v)| node_count(k) + node_count(v))
                .sum::<usize>()
        }
    }
}

fn resolve_scalar_tag(value: &str, style: &TScalarStyle, explicit: Option<&Tag>) -> ScalarTag {
    if let Some(tag) = explicit {
        if let Some(core) = core_tag(tag) {
            return core;
        }
        // A bare `!` is the non-specific tag: the scalar is a string.
        if tag.handle == "!" && tag.suffix.is_empty() {
            return ScalarTag::Str;
        }
        return ScalarTag::Custom(format!("{}{}", tag.handle, tag.suffix));
    }
    if !matches!(style, TScalarStyle::Plain) {
        return ScalarTag::Str;
    }
    resolve_plain(value)
}

fn core_tag(tag: &Tag) -> Option<ScalarTag> {
    if tag.handle != "!!" && tag.handle != CORE_TAG_PREFIX {
        return None;
    }
    match tag.suffix.as_str() {
        "null" => Some(ScalarTag::Null),
        "bool" => Some(ScalarTag::Bool),
        "int" => Some(ScalarTag::Int),
        "float" => Some(ScalarTag::Float),
        "str" => Some(ScalarTag::Str),
        _ => None,
    }
}

/// Resolve a plain scalar with the YAML 1.2 core schema.
fn resolve_plain(value: &str) -> ScalarTag {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => ScalarTag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => ScalarTag::Bool,
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf"
        | "-.INF" | ".nan" | ".NaN" | ".NAN" => ScalarTag::Float,
        _ if is_core_int(value) => ScalarTag::Int,
        _ if is_core_float(value) => ScalarTag::Float,
        _ => ScalarTag::Str,
    }
}

fn is_core_int(value: &str) -> bool {
    let all = |s: &str, f: fn(char) -> bool| !s.is_empty() && s.chars().all(f);
    if let Some(oct) = value.strip_prefix("0o") {
        return all(oct, |c| c.is_digit(8));
    }
    if let Some(hex) = value.strip_prefix("0x") {
        return all(hex, |c| c.is_ascii_hexdigit());
    }
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    all(digits, |c| c.is_ascii_digit())
}

fn is_core_float(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(content: &str) -> Node {
        let mut docs = parse_str(content).unwrap();
        assert_eq!(docs.len(), 1, "expected exactly one document");
        docs.remove(0)
    }

    #[test]
    fn mapping_keeps_document_order_and_lines() {
        let doc = single("apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\n");
        let entries = doc.as_mapping().unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.text()).collect();
        assert_eq!(keys, ["apiVersion", "kind", "metadata"]);
        assert_eq!(entries[0].0.line, 1);
        assert_eq!(entries[1].1.line, 2);

        let name = doc.get("metadata").and_then(|m| m.get("name")).unwrap();
        assert_eq!(name.text(), "web");
        assert_eq!(name.line, 4);
    }

    #[test]
    fn plain_integers_resolve_to_int() {
        let doc = single("a: 80\nb: -3\nc: 0x1F\nd: 0o17\n");
        for key in ["a", "b", "c", "d"] {
            assert_eq!(doc.get(key).and_then(Node::tag), Some(&ScalarTag::Int), "{key}");
        }
    }

    #[test]
    fn quoted_numbers_are_strings() {
        let doc = single("a: \"80\"\nb: '80'\n");
        assert_eq!(doc.get("a").and_then(Node::tag), Some(&ScalarTag::Str));
        assert_eq!(doc.get("b").and_then(Node::tag), Some(&ScalarTag::Str));
        assert_eq!(doc.get("a").map(Node::text), Some("80"));
    }

    #[test]
    fn explicit_tags_override_resolution() {
        let doc = single("a: !!int \"80\"\nb: !!str 80\nc: !secret hunter2\n");
        assert_eq!(doc.get("a").and_then(Node::tag), Some(&ScalarTag::Int));
        assert_eq!(doc.get("b").and_then(Node::tag), Some(&ScalarTag::Str));
        assert!(matches!(
            doc.get("c").and_then(Node::tag),
            Some(ScalarTag::Custom(_))
        ));
    }

    #[test]
    fn other_plain_scalars_resolve_by_core_schema() {
        let doc = single("a: true\nb: 1.5\nc: ~\nd:\ne: 512Mi\nf: .inf\n");
        assert_eq!(doc.get("a").and_then(Node::tag), Some(&ScalarTag::Bool));
        assert_eq!(doc.get("b").and_then(Node::tag), Some(&ScalarTag::Float));
        assert_eq!(doc.get("c").and_then(Node::tag), Some(&ScalarTag::Null));
        assert_eq!(doc.get("d").and_then(Node::tag), Some(&ScalarTag::Null));
        assert_eq!(doc.get("e").and_then(Node::tag), Some(&ScalarTag::Str));
        assert_eq!(doc.get("f").and_then(Node::tag), Some(&ScalarTag::Float));
    }

    #[test]
    fn null_scalars_have_empty_text() {
        let doc = single("a: ~\nb:\nc: null\n");
        for key in ["a", "b", "c"] {
            assert_eq!(doc.get(key).map(Node::text), Some(""), "{key}");
        }
    }

    #[test]
    fn sequences_of_mappings() {
        let doc = single("ports:\n  - containerPort: 80\n  - containerPort: 443\n    protocol: TCP\n");
        let ports = doc.get("ports").and_then(Node::as_sequence).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[1].get("protocol").map(Node::text), Some("TCP"));
        assert_eq!(ports[1].get("protocol").map(|n| n.line), Some(4));
    }

    #[test]
    fn aliases_expand_to_anchored_node() {
        let doc = single("base: &res\n  cpu: 1\ncopy: *res\n");
        let copy = doc.get("copy").unwrap();
        assert_eq!(copy.get("cpu").map(Node::text), Some("1"));
        assert_eq!(copy.line, 3);
    }

    #[test]
    fn empty_values_take_the_line_of_their_key() {
        let doc = single("metadata:\n  name:\nspec:\n  os: ~\nmemory:\n");
        let name = doc.get("metadata").and_then(|m| m.get("name")).unwrap();
        assert_eq!(name.tag(), Some(&ScalarTag::Null));
        assert_eq!(name.line, 2);
        assert_eq!(doc.get("spec").and_then(|s| s.get("os")).map(|n| n.line), Some(4));
        assert_eq!(doc.get("memory").map(|n| n.line), Some(5));
    }

    #[test]
    fn empty_document_root_is_on_its_start_line() {
        let doc = single("---\n");
        assert_eq!(doc.tag(), Some(&ScalarTag::Null));
        assert_eq!(doc.line, 1);
    }

    #[test]
    fn nested_aliases_past_the_budget_are_rejected() {
        let mut text = String::from("a0: &a0 [x, x, x, x, x, x, x, x, x, x]\n");
        for level in 1..=9 {
            let refs = vec![format!("*a{}", level - 1); 10].join(", ");
            text.push_str(&format!("a{level}: &a{level} [{refs}]\n"));
        }
        let started = std::time::Instant::now();
        let err = parse_str(&text).unwrap_err();
        assert!(
            matches!(&err, LoadError::Parse { reason } if reason.contains("alias expansion")),
            "got {err}"
        );
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn aliases_within_the_budget_still_expand() {
        let text = "base: &b [1, 2, 3]\nx: [*b, *b, *b]\n";
        let doc = single(text);
        let x = doc.get("x").and_then(Node::as_sequence).unwrap();
        assert_eq!(x.len(), 3);
        assert_eq!(x[2].as_sequence().map(<[Node]>::len), Some(3));
    }

    #[test]
    fn multiple_documents_in_stream_order() {
        let docs = parse_str("kind: Pod\n---\nkind: Service\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get("kind").map(Node::text), Some("Service"));
        assert_eq!(docs[1].get("kind").map(|n| n.line), Some(3));
    }

    #[test]
    fn empty_stream_has_no_documents() {
        assert!(parse_str("").unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse_str("a: [1, 2\nb: c\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "got {err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/podlint/pod.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "got {err}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every 64-bit integer written plain resolves to `!!int` with its
        /// literal text intact.
        #[test]
        fn plain_i64_resolves_to_int(n in any::<i64>()) {
            let docs = parse_str(&format!("port: {n}\n")).unwrap();
            let port = docs[0].get("port").unwrap();
            prop_assert_eq!(port.tag(), Some(&ScalarTag::Int));
            prop_assert_eq!(port.text(), n.to_string());
        }

        /// Quoting always yields a string, whatever the content looks like.
        #[test]
        fn double_quoted_is_always_str(s in "[a-zA-Z0-9 ._-]{0,16}") {
            let docs = parse_str(&format!("value: \"{s}\"\n")).unwrap();
            let value = docs[0].get("value").unwrap();
            prop_assert_eq!(value.tag(), Some(&ScalarTag::Str));
            prop_assert_eq!(value.text(), s.as_str());
        }

        /// Parsing is deterministic.
        #[test]
        fn parse_is_deterministic(n in 0u32..100_000, name in "[a-z]{1,12}") {
            let text = format!("name: {name}\nports:\n  - containerPort: {n}\n");
            prop_assert_eq!(parse_str(&text).unwrap(), parse_str(&text).unwrap());
        }
    }
}
