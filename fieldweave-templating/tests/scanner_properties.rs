//! Property-based tests for the scanner, splitter and token-free rendering

use std::sync::Arc;

use fieldweave_fields::{FieldsContext, Record, RecordStore};
use fieldweave_templating::{next_token, separated_part, TemplateEngine};
use proptest::prelude::*;
use uuid::Uuid;

fn is_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    for c in text.chars() {
        match c {
            '{' | '<' => depth += 1,
            '}' | '>' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

proptest! {
    /// Property: any span returned by the scanner is balanced and begins
    /// and ends with matching delimiter kinds.
    #[test]
    fn spans_are_balanced(text in r"[ab|:{}<>éë€]{0,48}|[aé]{0,4}<iif\|[ab{}<>|ë€]{0,24}") {
        if let Some(span) = next_token(&text, "") {
            let token = span.text(&text);
            prop_assert!(is_balanced(token), "unbalanced span {:?} in {:?}", token, text);
            prop_assert!(token.starts_with('{') || token.starts_with('<'), "bad span start {:?} in {:?}", token, text);
            prop_assert!(token.ends_with('}') || token.ends_with('>'), "bad span end {:?} in {:?}", token, text);
        }
    }

    /// Property: replacing each scanned token with plain text eventually
    /// leaves nothing to scan.
    #[test]
    fn scanning_terminates(text in r"[ab|{}<>éë€]{0,64}|(<system\|[a-zé]{1,4}>|\{[a-zë]{1,4}\}|[ab €]){0,12}") {
        let mut buffer = text.clone();
        let mut steps = 0;
        while let Some(span) = next_token(&buffer, "") {
            buffer.replace_range(span.start..span.end, "x");
            steps += 1;
            prop_assert!(steps <= text.len(), "scanner did not terminate on {:?}", text);
        }
    }

    /// Property: without nested delimiters the splitter agrees with `str::split`.
    #[test]
    fn splitter_matches_plain_split(parts in prop::collection::vec("[a-z éë€]{0,6}", 1..6), n in 1usize..8) {
        let source = parts.join("|");
        let expected = parts.get(n - 1).cloned().unwrap_or_default();
        prop_assert_eq!(separated_part(&source, "|", n), expected);
    }

    /// Property: splitting on a multi-byte separator agrees with `str::split`.
    #[test]
    fn multibyte_separator_matches_plain_split(parts in prop::collection::vec("[a-zé ]{0,6}", 1..6), n in 1usize..8) {
        let source = parts.join("€");
        let expected = parts.get(n - 1).cloned().unwrap_or_default();
        prop_assert_eq!(separated_part(&source, "€", n), expected);
    }

    /// Property: nested tokens used as arguments are never split.
    #[test]
    fn nested_arguments_stay_whole(head in "[a-zé]{1,5}", inner in "[a-z|ë€]{0,10}", tail in "[a-zü]{0,5}") {
        let nested = format!("<{inner}>");
        let source = format!("{head}|{nested}|{tail}");
        prop_assert_eq!(separated_part(&source, "|", 2), nested);
        prop_assert_eq!(separated_part(&source, "|", 3), tail);
    }

    /// Property: text with no tokens renders unchanged.
    #[test]
    fn token_free_text_is_unchanged(text in r"[a-zA-Z0-9 .,;:!?|#\[\]\n éëüß€→-]{0,80}") {
        let engine = TemplateEngine::builder(
            Arc::new(RecordStore::new()),
            Arc::new(FieldsContext::default()),
        )
        .build();
        let record = Record::new("account", Uuid::nil());
        prop_assert_eq!(engine.render(&record, &text).unwrap(), text);
    }
}
