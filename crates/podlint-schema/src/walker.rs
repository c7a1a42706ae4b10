//! # Schema Walker
//!
//! Generic traversal of one mapping node against one [`MappingRule`].
//!
//! For every `(key, value)` pair, in document order, the walker dispatches
//! to the handler registered for the key. Keys without a handler are
//! skipped silently unless the rule has a catch-all handler: extra fields
//! are tolerated so manifests can carry fields this linter does not know.
//! After the last pair, every required field that never appeared produces
//! a missing-field diagnostic, in rule order.
//!
//! The walker checks the node's shape first. A scalar or sequence where a
//! mapping is expected yields one type mismatch and the subtree is skipped.

use std::collections::HashSet;

use podlint_core::{ExpectedType, Node};

use crate::context::ValidationContext;

/// Handler for one field: receives the key node and the value node.
pub type FieldCheck = fn(&mut ValidationContext, &Node, &Node);

/// Handler for one element of a sequence.
pub type ItemCheck = fn(&mut ValidationContext, &Node);

/// A known field of a mapping.
#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub check: FieldCheck,
}

impl Field {
    pub const fn required(name: &'static str, check: FieldCheck) -> Self {
        Self {
            name,
            required: true,
            check,
        }
    }

    pub const fn optional(name: &'static str, check: FieldCheck) -> Self {
        Self {
            name,
            required: false,
            check,
        }
    }
}

/// Static description of one mapping-shaped schema context: its known
/// fields, which of them are required, and an optional handler for every
/// other key.
pub struct MappingRule {
    /// Context name, used in log output.
    pub name: &'static str,
    pub fields: &'static [Field],
    pub other: Option<FieldCheck>,
}

impl MappingRule {
    /// Look up the handler for a key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == key)
    }

    /// Required field names, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

/// Walk `node` as a mapping described by `rule`.
///
/// `field` names the value being walked and is used only if `node` turns
/// out not to be a mapping.
pub fn walk_mapping(ctx: &mut ValidationContext, field: &str, node: &Node, rule: &MappingRule) {
    let Some(entries) = node.as_mapping() else {
        tracing::debug!(
            rule = rule.name,
            found = node.kind_name(),
            line = node.line,
            "expected a mapping"
        );
        ctx.type_mismatch(field, ExpectedType::Mapping, node.line);
        return;
    };

    tracing::trace!(rule = rule.name, entries = entries.len(), "walking mapping");

    let mut seen: HashSet<&str> = HashSet::new();
    for (key, value) in entries {
        let name = key.text();
        match rule.field(name) {
            Some(known) => (known.check)(ctx, key, value),
            None => {
                if let Some(other) = rule.other {
                    other(ctx, key, value);
                }
            }
        }
        seen.insert(name);
    }

    for name in rule.required() {
        if !seen.contains(name) {
            ctx.missing_required(name);
        }
    }
}

/// Walk `node` as a sequence, handing every element to `item`.
pub fn walk_sequence(ctx: &mut ValidationContext, field: &str, node: &Node, item: ItemCheck) {
    let Some(items) = node.as_sequence() else {
        tracing::debug!(field, found = node.kind_name(), line = node.line, "expected a sequence");
        ctx.type_mismatch(field, ExpectedType::Sequence, node.line);
        return;
    };
    for element in items {
        item(ctx, element);
    }
}
