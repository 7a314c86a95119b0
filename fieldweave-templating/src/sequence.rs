//! Sequence placeholders
//!
//! `[#start|format]` is replaced by `(start - 1) + sequence` (or
//! `start + sequence` when `start` is not positive), formatted with a
//! numeric format string. This runs once, after all tokens of a top-level
//! render have been substituted.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::format::format_number;

static SEQUENCE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[#([^\[\]|]*)\|([^\[\]]*)\]")
        .expect("Failed to compile sequence placeholder regex")
});

/// Replace every sequence placeholder in `text`.
///
/// Placeholders whose start value is not an integer are left untouched.
///
/// ```
/// use fieldweave_templating::sequence::rewrite_sequences;
///
/// assert_eq!(rewrite_sequences("INV-[#100|000]", 3), "INV-102");
/// ```
pub fn rewrite_sequences(text: &str, sequence: u64) -> String {
    let mut out = text.to_string();
    let mut from = 0;

    while let Some(caps) = SEQUENCE_PLACEHOLDER.captures_at(&out, from) {
        let Some(whole) = caps.get(0) else { break };
        let start_text = caps.get(1).map_or("", |m| m.as_str()).trim();
        let format = caps.get(2).map_or("", |m| m.as_str());

        let Ok(start) = start_text.parse::<i64>() else {
            debug!(placeholder = whole.as_str(), "sequence start is not an integer");
            from = whole.end();
            continue;
        };
        let base = if start > 0 { start - 1 } else { start };
        let value = base.saturating_add(i64::try_from(sequence).unwrap_or(i64::MAX));
        let replacement = format_number(Decimal::from(value), format);

        let range = whole.range();
        from = range.start + replacement.len();
        out.replace_range(range, &replacement);
    }
    out
}
