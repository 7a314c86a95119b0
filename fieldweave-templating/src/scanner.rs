//! Token scanning and argument splitting
//!
//! Tokens nest: a conditional's branches or an expand's inner format are
//! themselves tokens. Both the scanner and the splitter therefore track
//! delimiter depth over `{`, `}`, `<` and `>` and only act at depth zero.

use crate::token::TokenKind;

/// Location of one scanned token within a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    pub kind: TokenKind,
}

impl TokenSpan {
    /// The whole token, delimiters included.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The token without its outer delimiters.
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start + 1..self.end - 1]
    }
}

fn depth_delta(byte: u8) -> isize {
    match byte {
        b'{' | b'<' => 1,
        b'}' | b'>' => -1,
        _ => 0,
    }
}

/// Offset of the delimiter closing the one at `open`, if the text balances.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth: isize = 0;
    for (offset, byte) in text.as_bytes()[open..].iter().enumerate() {
        depth += depth_delta(*byte);
        if depth == 0 {
            return Some(open + offset);
        }
    }
    None
}

/// If a functional token opens at `at`, its scope (empty if unscoped) and kind.
fn functional_at(text: &str, at: usize) -> Option<(&str, TokenKind)> {
    let rest = text.get(at + 1..)?;
    let head_end = rest.find(['|', '<', '>', '{', '}'])?;
    if rest.as_bytes()[head_end] != b'|' {
        return None;
    }
    let head = &rest[..head_end];
    let (scope, name) = match head.split_once(':') {
        Some((scope, name)) => (scope, name),
        None => ("", head),
    };
    TokenKind::from_function_name(name).map(|kind| (scope, kind))
}

fn field_in_scope(body: &str, scope: &str) -> bool {
    scope.is_empty()
        || body
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Every top-level token the pass for `scope` may consume, in text order.
///
/// Functional tokens (`<name|...>`) must carry exactly the pass's scope
/// (`<scope:name|...>`, or no prefix for the unscoped pass). Field tokens
/// are all eligible in the unscoped pass and restricted to `{scope:...}`
/// otherwise. Tokens belonging to other scopes are skipped whole, and an
/// opener with no matching close is treated as plain text.
pub fn top_level_tokens(text: &str, scope: &str) -> Vec<TokenSpan> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let functional = match bytes[i] {
            b'<' => functional_at(text, i),
            _ => None,
        };
        if bytes[i] != b'{' && functional.is_none() {
            i += 1;
            continue;
        }
        let Some(close) = matching_close(text, i) else {
            i += 1;
            continue;
        };

        let kind = match functional {
            Some((token_scope, kind)) if token_scope == scope => Some(kind),
            Some(_) => None,
            None if field_in_scope(&text[i + 1..close], scope) => Some(TokenKind::Field),
            None => None,
        };
        if let Some(kind) = kind {
            tokens.push(TokenSpan {
                start: i,
                end: close + 1,
                kind,
            });
        }
        i = close + 1;
    }

    tokens
}

/// Find the next token the pass for `scope` should consume.
///
/// The first top-level functional token wins; failing that, the first
/// top-level field token. See [`top_level_tokens`] for scoping rules.
pub fn next_token(text: &str, scope: &str) -> Option<TokenSpan> {
    let tokens = top_level_tokens(text, scope);
    tokens
        .iter()
        .find(|token| token.kind != TokenKind::Field)
        .or_else(|| tokens.first())
        .copied()
}

/// Byte offsets of every depth-zero occurrence of `separator` in `source`.
fn top_level_separators(source: &str, separator: &str) -> Vec<usize> {
    let bytes = source.as_bytes();
    let needle = separator.as_bytes();
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    let mut depth: isize = 0;
    let mut i = 0;
    while i < bytes.len() {
        // Matching whole UTF-8 sequences keeps every hit on a char boundary.
        if depth == 0 && bytes[i..].starts_with(needle) {
            found.push(i);
            i += needle.len();
            continue;
        }
        depth = (depth + depth_delta(bytes[i])).max(0);
        i += 1;
    }
    found
}

/// The `n`th (1-based) `separator`-delimited part of `source`.
///
/// Separators inside nested `{...}` or `<...>` do not split. Asking for a
/// part past the end, or part 0, yields an empty string.
///
/// ```
/// use fieldweave_templating::separated_part;
///
/// assert_eq!(separated_part("a|b|<c|d>|e", "|", 3), "<c|d>");
/// assert_eq!(separated_part("a|b", "|", 5), "");
/// ```
pub fn separated_part(source: &str, separator: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let separators = top_level_separators(source, separator);
    if n > separators.len() + 1 {
        return String::new();
    }
    let start = if n == 1 {
        0
    } else {
        separators[n - 2] + separator.len()
    };
    let end = separators.get(n - 1).copied().unwrap_or(source.len());
    source[start..end].to_string()
}

/// Everything after the first depth-zero `separator`, or empty if there is none.
pub(crate) fn after_first_part<'a>(source: &'a str, separator: &str) -> &'a str {
    match top_level_separators(source, separator).first() {
        Some(&at) => &source[at + separator.len()..],
        None => "",
    }
}

/// Split at the first depth-zero `separator`.
pub(crate) fn split_first_part<'a>(source: &'a str, separator: &str) -> (&'a str, Option<&'a str>) {
    match top_level_separators(source, separator).first() {
        Some(&at) => (&source[..at], Some(&source[at + separator.len()..])),
        None => (source, None),
    }
}
