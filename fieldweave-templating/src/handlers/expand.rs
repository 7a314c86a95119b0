//! `<expand|childType|relation|format|order|separator|distinct|activeOnly|maxCount>`
//!
//! Renders every related record of `childType` (joined to the current
//! record through `relation`) with `format`, then joins the non-blank
//! results. `##` in a rendered result becomes the 1-based position of the
//! child in relation order.

use fieldweave_fields::{ColumnSet, OrderBy, RelatedQuery};

use super::{arg, unescape_controls};
use crate::engine::Frame;
use crate::error::{Result, TemplatingError};

/// Parse `attr[/ASC|DESC], attr2[/ASC|DESC]`.
fn parse_order(text: &str) -> Result<Vec<OrderBy>> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('/') {
            None => Ok(OrderBy::ascending(entry)),
            Some((field, direction)) => match direction.trim().to_ascii_uppercase().as_str() {
                "ASC" => Ok(OrderBy::ascending(field.trim())),
                "DESC" => Ok(OrderBy::descending(field.trim())),
                _ => Err(TemplatingError::InvalidOrder {
                    entry: entry.to_string(),
                }),
            },
        })
        .collect()
}

fn parse_flag(frame: &Frame<'_>, text: &str, default: bool) -> bool {
    match text.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        other => {
            frame.log(format!("unrecognized flag '{other}', using {default}"));
            default
        }
    }
}

/// `None` means unbounded.
fn parse_max_count(frame: &Frame<'_>, text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<i64>() {
        Ok(max) if max > 0 => usize::try_from(max).ok(),
        Ok(_) => None,
        Err(_) => {
            frame.log(format!("maxCount '{text}' is not a number, no limit applied"));
            None
        }
    }
}

pub(crate) fn expand(frame: &Frame<'_>, body: &str) -> Result<String> {
    let _section = frame.section("Expand");
    let child_entity = arg(body, 2).trim().to_string();
    let relation_field = arg(body, 3).trim().to_string();
    let mut format = arg(body, 4);
    let order = parse_order(&arg(body, 5))?;
    let separator = match arg(body, 6) {
        sep if sep.is_empty() => frame.engine.config.expand_separator.clone(),
        sep => unescape_controls(&sep, &[(r"\n", "\n"), (r"\r", "\r")]),
    };
    let distinct = parse_flag(frame, &arg(body, 7), false);
    let active_only = parse_flag(frame, &arg(body, 8), true);
    let max_count = parse_max_count(frame, &arg(body, 9));

    if format.is_empty() {
        match frame.engine.metadata.primary_field(&child_entity) {
            Some(primary) => format = format!("{{{primary}}}"),
            None => {
                frame.log(format!("{child_entity} has no primary field and no format was given"));
                return Ok(String::new());
            }
        }
    }

    let sorted_by_relation = !order.is_empty();
    let query = RelatedQuery {
        child_entity,
        relation_field,
        active_only,
        order,
        columns: ColumnSet::All,
    };
    let children = frame
        .engine
        .records
        .retrieve_related(frame.record, &query)?;
    frame.log(format!(
        "{} related {} through {}",
        children.len(),
        query.child_entity,
        query.relation_field
    ));

    let mut results: Vec<String> = Vec::new();
    for (index, child) in children.iter().enumerate() {
        if max_count.is_some_and(|max| results.len() >= max) {
            break;
        }
        let rendered = frame
            .render_nested(child, &format)?
            .replace("##", &(index + 1).to_string());
        if rendered.trim().is_empty() {
            continue;
        }
        if distinct && results.contains(&rendered) {
            continue;
        }
        results.push(rendered);
    }

    if !sorted_by_relation {
        results.sort();
    }
    Ok(results.join(&separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_entries() {
        assert!(parse_order("").unwrap().is_empty());
        assert_eq!(
            parse_order("lastname, firstname/desc ,age/ASC").unwrap(),
            vec![
                OrderBy::ascending("lastname"),
                OrderBy::descending("firstname"),
                OrderBy::ascending("age"),
            ]
        );
    }

    #[test]
    fn bad_direction_is_an_error() {
        let err = parse_order("name/UP").unwrap_err();
        assert!(matches!(err, TemplatingError::InvalidOrder { entry } if entry == "name/UP"));
    }
}
