//! Text rendering of trace entries.
//!
//! Renders single lines for immediate output and aligned blocks for batched
//! output, plus the message payloads produced by value dumps and checks.

use std::fmt::Debug;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use crate::line_buffer::Entry;

/// Separator placed between a prefix and a non-empty message.
pub const SEPARATOR: &str = "- ";

/// Marker prepended to check messages.
pub const CHECK_TAG: &str = "CHECK";

/// Marker strings bracketing a rendered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Written on the line before the first entry.
    pub begin: String,

    /// Written on the line after the last entry.
    pub end: String,
}

impl Markers {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("-----", "=====")
    }
}

/// Renders one entry on its own, without a trailing newline.
///
/// Bare entries render as their prefix alone.
pub fn render_single(entry: &Entry) -> String {
    let mut out = String::with_capacity(entry.prefix().len() + entry.message().len() + SEPARATOR.len());
    push_line(&mut out, entry, 0);
    out
}

/// Renders a batch of entries as one block.
///
/// Each prefix is left-justified to the widest prefix in the batch so the
/// messages form a single column. Every line, markers included, ends with a
/// newline. An empty batch renders as an empty string.
///
/// # Examples
///
/// ```
/// # use dabug::{Entry, Source, Markers};
/// # use dabug::renderer::render_block;
/// let at = |file: &str, line| Source { file: file.into(), function: String::new(), line };
/// let entries = [
///     Entry::new("first", at("a.rs", 1), ""),
///     Entry::new("second", at("bb.rs", 22), ""),
/// ];
/// let block = render_block(&entries, "", &Markers::default());
/// assert_eq!(block, "-----\na.rs:1   - first\nbb.rs:22 - second\n=====\n");
/// ```
pub fn render_block(entries: &[Entry], global_prefix: &str, markers: &Markers) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let width = entries
        .iter()
        .map(|entry| entry.prefix().width())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(global_prefix);
    out.push_str(&markers.begin);
    out.push('\n');

    for entry in entries {
        push_line(&mut out, entry, width);
        out.push('\n');
    }

    out.push_str(global_prefix);
    out.push_str(&markers.end);
    out.push('\n');
    out
}

/// Appends one entry, padding its prefix to at least `width` columns.
fn push_line(out: &mut String, entry: &Entry, width: usize) {
    let prefix = entry.prefix();
    out.push_str(prefix);
    let padding = width.saturating_sub(prefix.width());
    out.extend(std::iter::repeat(' ').take(padding));

    if !entry.is_bare() {
        out.push_str(SEPARATOR);
        out.push_str(entry.message());
    }
}

/// Joins values as `[index] {value:?}` pairs separated by `", "`.
///
/// Uses the `Debug` representation, so a value's `Display` impl never affects
/// the output.
///
/// ```
/// # use dabug::renderer::dump_values;
/// assert_eq!(dump_values(&[&42, &"x"]), r#"[0] 42, [1] "x""#);
/// ```
pub fn dump_values(values: &[&dyn Debug]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| format!("[{i}] {value:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a check message: `CHECK - {json}`, or `CHECK` when the value
/// cannot be serialized.
pub fn check_message<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => format!("{CHECK_TAG} {SEPARATOR}{json}"),
        Err(err) => {
            tracing::debug!(error = %err, "check value could not be serialized");
            CHECK_TAG.to_string()
        }
    }
}
