//! # Leaf Checks
//!
//! Type, range, pattern and enumeration checks for scalar fields. Each
//! check appends at most one diagnostic and never stops its siblings.
//!
//! String-valued checks first make sure the value is a scalar at all; a
//! mapping or sequence in their place is a type mismatch rather than an
//! empty string.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use podlint_core::{ExpectedType, Node, ScalarTag};
use regex::Regex;

use crate::context::ValidationContext;

static SNAKE_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+(_[a-z]+)*$").expect("snake_case pattern"));

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^registry.bigbrother.io/(.*):(.*)$").expect("image reference pattern")
});

static MEMORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(Mi|Gi|Ki)$").expect("memory quantity pattern"));

/// Text of `value` if it is a scalar; otherwise records a string type
/// mismatch at `line`.
pub fn scalar_text<'n>(
    ctx: &mut ValidationContext,
    field: &str,
    value: &'n Node,
    line: usize,
) -> Option<&'n str> {
    if value.is_scalar() {
        Some(value.text())
    } else {
        ctx.type_mismatch(field, ExpectedType::String, line);
        None
    }
}

/// The value must be one of `allowed`.
pub fn check_enum(
    ctx: &mut ValidationContext,
    field: &str,
    value: &Node,
    allowed: &[&str],
    line: usize,
) {
    if let Some(text) = scalar_text(ctx, field, value, line) {
        if !allowed.contains(&text) {
            ctx.unsupported_value(field, text, line);
        }
    }
}

/// The value must be a non-empty string; with `snake_case` set it must also
/// be a snake_case identifier.
pub fn check_name(ctx: &mut ValidationContext, value: &Node, snake_case: bool) {
    let Some(text) = scalar_text(ctx, "name", value, value.line) else {
        return;
    };
    if text.is_empty() {
        ctx.required("name", value.line);
    } else if snake_case && !SNAKE_CASE_RE.is_match(text) {
        ctx.invalid_format("name", text, value.line);
    }
}

/// The value must be a registry.bigbrother.io image reference with a tag.
pub fn check_image(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    if let Some(text) = scalar_text(ctx, key.text(), value, key.line) {
        if !IMAGE_RE.is_match(text) {
            ctx.invalid_format(key.text(), text, key.line);
        }
    }
}

/// The value must be an absolute HTTP path.
pub fn check_http_path(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    if let Some(text) = scalar_text(ctx, key.text(), value, key.line) {
        if !text.starts_with('/') {
            ctx.invalid_format(key.text(), text, key.line);
        }
    }
}

/// The value must be an `!!int` within `[from, to]`, inclusive.
///
/// Diagnostics point at the key's line. An integer too large for 64 bits is
/// out of every range this schema uses.
pub fn check_int_range(ctx: &mut ValidationContext, key: &Node, value: &Node, from: i64, to: i64) {
    let field = key.text();
    if value.tag() != Some(&ScalarTag::Int) {
        ctx.type_mismatch(field, ExpectedType::Int, key.line);
        return;
    }
    match parse_int(value.text()) {
        Ok(n) if (from..=to).contains(&n) => {}
        Ok(_) => ctx.out_of_range(field, key.line),
        Err(kind) if is_overflow(&kind) => ctx.out_of_range(field, key.line),
        // An explicit `!!int` on text that is not a number at all.
        Err(_) => ctx.type_mismatch(field, ExpectedType::Int, key.line),
    }
}

/// The value must be a memory quantity such as `512Mi`, with an amount of
/// at least 1.
pub fn check_memory(ctx: &mut ValidationContext, value: &Node) {
    let Some(text) = scalar_text(ctx, "memory", value, value.line) else {
        return;
    };
    let Some(caps) = MEMORY_RE.captures(text) else {
        ctx.invalid_format("memory", text, value.line);
        return;
    };
    match caps[1].parse::<u64>() {
        Ok(amount) if amount >= 1 => {}
        Ok(_) => ctx.out_of_range("memory", value.line),
        Err(e) if is_overflow(e.kind()) => ctx.out_of_range("memory", value.line),
        Err(_) => ctx.type_mismatch("memory", ExpectedType::Int, value.line),
    }
}

/// Parse YAML core-schema integer text: decimal with optional sign, `0o`
/// octal, or `0x` hexadecimal.
fn parse_int(text: &str) -> Result<i64, IntErrorKind> {
    let parsed = if let Some(oct) = text.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if let Some(hex) = text.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else {
        text.parse::<i64>()
    };
    parsed.map_err(|e| e.kind().clone())
}

fn is_overflow(kind: &IntErrorKind) -> bool {
    matches!(kind, IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
}
