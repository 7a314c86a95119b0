//! Token handlers, one module per [`crate::TokenKind`].
//!
//! Each handler receives the token body (the text between the outer
//! delimiters) and returns the value to splice over the token.

pub(crate) mod conditional;
pub(crate) mod expand;
pub(crate) mod fields;
pub mod formula;
pub(crate) mod random;
pub(crate) mod system;

use crate::scanner::separated_part;

/// The `n`th `|`-separated argument of a token body; part 1 is the function name.
pub(crate) fn arg(body: &str, n: usize) -> String {
    separated_part(body, "|", n)
}

/// Replace backslash escapes such as `\n` with the characters they name.
pub(crate) fn unescape_controls(text: &str, escapes: &[(&str, &str)]) -> String {
    escapes
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
