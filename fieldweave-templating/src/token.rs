//! Token kinds

use std::fmt;

/// The handler a scanned token is routed to.
///
/// Decided once per token from its discriminator: the function name of a
/// `<name|...>` token, or [`TokenKind::Field`] for `{...}` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Field,
    Expand,
    Conditional,
    System,
    Random,
    Formula,
}

impl TokenKind {
    /// Every functional kind, in the order their names are tried.
    pub const FUNCTIONS: [TokenKind; 5] = [
        TokenKind::Expand,
        TokenKind::Conditional,
        TokenKind::System,
        TokenKind::Random,
        TokenKind::Formula,
    ];

    /// The function name used in template text, `None` for field tokens.
    pub fn function_name(self) -> Option<&'static str> {
        match self {
            TokenKind::Field => None,
            TokenKind::Expand => Some("expand"),
            TokenKind::Conditional => Some("iif"),
            TokenKind::System => Some("system"),
            TokenKind::Random => Some("random"),
            TokenKind::Formula => Some("PowerFx"),
        }
    }

    /// Look up a functional kind by its exact name.
    pub fn from_function_name(name: &str) -> Option<TokenKind> {
        Self::FUNCTIONS
            .into_iter()
            .find(|kind| kind.function_name() == Some(name))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.function_name() {
            Some(name) => f.write_str(name),
            None => f.write_str("field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in TokenKind::FUNCTIONS {
            let name = kind.function_name().unwrap();
            assert_eq!(TokenKind::from_function_name(name), Some(kind));
        }
        assert_eq!(TokenKind::from_function_name("powerfx"), None);
        assert_eq!(TokenKind::from_function_name("name"), None);
        assert_eq!(TokenKind::Field.to_string(), "field");
    }
}
