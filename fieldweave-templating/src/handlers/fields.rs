//! Field tokens: `{[scope:]path[|format]}`
//!
//! A path is a field name, or a dotted chain that follows references
//! (`ownerid.businessunitid.name`). Each hop fetches the referenced record
//! with only the next field projected. The final value is formatted for
//! display, or handled by one of the format sentinels:
//!
//! - `<value>`: the raw, unformatted value
//! - `<recordurl>`: a deep link to the referenced (or holding) record
//! - `<expand|...>`: an expand token rendered against the referenced record

use std::borrow::Cow;

use fieldweave_fields::{AccessError, ColumnSet, FieldType, FieldValue, Record, RecordRef};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::engine::Frame;
use crate::error::Result;
use crate::format::{format_datetime, format_number};
use crate::scanner::split_first_part;

const RAW_VALUE: &str = "<value>";
const RECORD_URL: &str = "<recordurl>";
const EXPAND_PREFIX: &str = "<expand|";

/// Drop a `scope:` prefix, if a `:` comes before any `<` or `|`.
fn strip_scope(body: &str) -> &str {
    let head_end = body.find(['<', '|']).unwrap_or(body.len());
    match body[..head_end].find(':') {
        Some(colon) => &body[colon + 1..],
        None => body,
    }
}

/// The record a field points at: a reference value, or a bare id whose
/// metadata declares it a reference.
fn reference_of(frame: &Frame<'_>, record: &Record, field: &str) -> Option<RecordRef> {
    match record.get(field)? {
        FieldValue::Reference(reference) => Some(reference.clone()),
        FieldValue::Guid(id) => frame
            .engine
            .metadata
            .field_metadata(&record.entity, field)
            .and_then(|def| {
                def.reference_target(&record.entity)
                    .map(|entity| RecordRef::new(entity, *id))
            }),
        _ => None,
    }
}

/// Fetch a record on a relationship hop, applying the suppression policy.
///
/// `Ok(None)` means the failure was suppressed and the token renders empty.
fn fetch(
    frame: &Frame<'_>,
    target: &RecordRef,
    columns: &ColumnSet,
) -> Result<Option<Record>> {
    match frame
        .engine
        .records
        .retrieve(&target.entity, &target.id, columns)
    {
        Ok(record) => Ok(Some(record)),
        Err(err) if frame.options.suppress_path_errors => {
            suppressed(frame, target, &err);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn suppressed(frame: &Frame<'_>, target: &RecordRef, err: &AccessError) {
    warn!(entity = %target.entity, id = %target.id, error = %err, "relationship hop failed, suppressed");
    frame.log(format!(
        "suppressed error reading {} {}: {err}",
        target.entity, target.id
    ));
}

pub(crate) fn resolve(frame: &Frame<'_>, body: &str) -> Result<String> {
    let _section = frame.section("Field");
    let body = strip_scope(body);
    let (path, format) = split_first_part(body, "|");
    let path = path.trim();
    let format = format.unwrap_or("");

    if path.starts_with(EXPAND_PREFIX) {
        return frame.render_nested(frame.record, path);
    }

    let segments: Vec<&str> = if frame.record.contains(path) {
        vec![path]
    } else {
        path.split('.').map(str::trim).collect()
    };
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(String::new()),
    };

    let mut current = Cow::Borrowed(frame.record);
    let mut field = *first;
    for (hop, next) in rest.iter().enumerate() {
        let Some(target) = reference_of(frame, &current, field) else {
            frame.log(format!(
                "'{field}' on {} is not a reference, '{path}' resolves empty",
                current.entity
            ));
            return Ok(String::new());
        };
        if hop >= frame.engine.config.max_path_hops {
            frame.log(format!(
                "'{path}' exceeds {} relationship hops, resolves empty",
                frame.engine.config.max_path_hops
            ));
            return Ok(String::new());
        }
        match fetch(frame, &target, &ColumnSet::single(*next))? {
            Some(record) => current = Cow::Owned(record),
            None => return Ok(String::new()),
        }
        field = *next;
    }

    if format == RAW_VALUE {
        return Ok(current.get(field).map(FieldValue::raw_string).unwrap_or_default());
    }
    if format == RECORD_URL {
        let target = reference_of(frame, &current, field).unwrap_or_else(|| current.to_reference());
        return Ok(frame.engine.records.record_url(&target).unwrap_or_default());
    }
    if format.starts_with(EXPAND_PREFIX) {
        return match reference_of(frame, &current, field) {
            Some(target) => match fetch(frame, &target, &ColumnSet::All)? {
                Some(related) => frame.render_nested(&related, format),
                None => Ok(String::new()),
            },
            None => frame.render_nested(&current, format),
        };
    }

    match current.get(field) {
        Some(value) => Ok(display(frame, &current, field, value, format)),
        None => {
            frame.log(format!("field '{field}' not found on {}", current.entity));
            Ok(String::new())
        }
    }
}

/// Human-readable text for a field value.
fn display(frame: &Frame<'_>, record: &Record, field: &str, value: &FieldValue, format: &str) -> String {
    let config = &frame.engine.config;
    let metadata = frame.engine.metadata.field_metadata(&record.entity, field);
    let field_type = metadata.as_ref().map(|def| &def.type_);
    let option_label = |code: i32| {
        field_type
            .and_then(|t| t.option_label(code))
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string())
    };

    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::Integer(i) => format_number(Decimal::from(*i), format),
        FieldValue::Float(f) if format.is_empty() => f.to_string(),
        FieldValue::Float(f) => match Decimal::from_f64(*f) {
            Some(d) => format_number(d, format),
            None => f.to_string(),
        },
        FieldValue::Decimal(d) => format_number(*d, format),
        FieldValue::Money(d) => format_number(*d, if format.is_empty() { "N2" } else { format }),
        FieldValue::Boolean(b) => field_type
            .and_then(|t| t.boolean_label(*b))
            .map(str::to_string)
            .unwrap_or_else(|| b.to_string()),
        FieldValue::DateTime(dt) => {
            let format = match (format.is_empty(), field_type) {
                (false, _) => format,
                (true, Some(FieldType::Date)) => config.date_format.as_str(),
                (true, _) => config.date_time_format.as_str(),
            };
            format_datetime(dt, format, config.local_time)
        }
        FieldValue::Guid(id) => id.to_string(),
        FieldValue::OptionSet(code) => option_label(*code),
        FieldValue::OptionSets(codes) => codes
            .iter()
            .map(|code| option_label(*code))
            .collect::<Vec<_>>()
            .join("; "),
        FieldValue::Reference(reference) => reference_name(reference),
        FieldValue::References(references) => references
            .iter()
            .map(reference_name)
            .collect::<Vec<_>>()
            .join("; "),
    }
}

fn reference_name(reference: &RecordRef) -> String {
    reference
        .name
        .clone()
        .unwrap_or_else(|| reference.id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("name", "name")]
    #[case("s:name", "name")]
    #[case("s:owner.name|N2", "owner.name|N2")]
    #[case("createdon|HH:mm", "createdon|HH:mm")]
    #[case("owner|<expand|a:b|c>", "owner|<expand|a:b|c>")]
    fn scope_prefix(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(strip_scope(body), expected);
    }
}
