//! `<system|keyword|format>`

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use fieldweave_fields::ColumnSet;

use super::{arg, unescape_controls};
use crate::engine::Frame;
use crate::error::{Result, TemplatingError};
use crate::format::format_datetime;

/// Start of the current day, in UTC or in the local time zone.
fn start_of_today(local_time: bool) -> DateTime<Utc> {
    if local_time {
        let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
        match Local.from_local_datetime(&midnight).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc::now(),
        }
    } else {
        Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
    }
}

fn or_default<'a>(format: &'a str, default: &'a str) -> &'a str {
    if format.trim().is_empty() {
        default
    } else {
        format
    }
}

pub(crate) fn evaluate(frame: &Frame<'_>, body: &str) -> Result<String> {
    let keyword = arg(body, 2).trim().to_ascii_lowercase();
    let format = arg(body, 3);
    let config = &frame.engine.config;

    match keyword.as_str() {
        "now" => Ok(format_datetime(
            &Utc::now(),
            or_default(&format, &config.date_time_format),
            config.local_time,
        )),
        "today" => Ok(format_datetime(
            &start_of_today(config.local_time),
            or_default(&format, &config.date_format),
            config.local_time,
        )),
        "user" => current_user(frame, format.trim()),
        "char" => Ok(unescape_controls(
            &format,
            &[(r"\n", "\n"), (r"\r", "\r"), (r"\t", "\t")],
        )),
        _ => Err(TemplatingError::UnknownSystemKeyword { keyword }),
    }
}

/// Render `format` against the acting principal's record.
///
/// A bare field name is treated as `{name}`; no format renders the
/// principal's primary field.
fn current_user(frame: &Frame<'_>, format: &str) -> Result<String> {
    let records = &frame.engine.records;
    let principal = records.who_am_i()?;
    let user = records.retrieve(&principal.entity, &principal.id, &ColumnSet::All)?;

    let template = if format.is_empty() {
        match frame.engine.metadata.primary_field(&user.entity) {
            Some(primary) => format!("{{{primary}}}"),
            None => return Ok(principal.name.unwrap_or_default()),
        }
    } else if format.contains(['{', '<']) {
        format.to_string()
    } else {
        format!("{{{format}}}")
    };
    frame.render_nested(&user, &template)
}
