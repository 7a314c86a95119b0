//! `<random|kind|param1|param2>`
//!
//! - `text|length[|alphabet]`, length at most `max_template_size`
//! - `number|max` or `number|min|max` (inclusive)
//! - `date[|from[|to[|format]]]` with `YYYY-MM-DD` bounds
//! - `guid`

use chrono::{Days, NaiveDate, NaiveTime};
use rand::{Rng, RngCore};

use super::arg;
use crate::engine::Frame;
use crate::error::{Result, TemplatingError};
use crate::format::format_datetime;

const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn parse_number(text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| {
        TemplatingError::invalid_random(format!("'{text}' is not a whole number"))
    })
}

fn parse_date(text: &str, default: (i32, u32, u32)) -> Result<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        let (year, month, day) = default;
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| TemplatingError::invalid_random("default date out of range"));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        TemplatingError::invalid_random(format!("'{text}' is not a YYYY-MM-DD date"))
    })
}

pub(crate) fn generate(frame: &Frame<'_>, body: &str) -> Result<String> {
    let kind = arg(body, 2).trim().to_ascii_lowercase();
    let first = arg(body, 3);
    let second = arg(body, 4);
    let random = &frame.engine.random;

    match kind.as_str() {
        "text" => {
            let length = parse_number(&first)?;
            if length <= 0 {
                return Err(TemplatingError::invalid_random(format!(
                    "text length must be positive, got {length}"
                )));
            }
            let max = frame.engine.config.max_template_size;
            if usize::try_from(length).map_or(true, |length| length > max) {
                return Err(TemplatingError::invalid_random(format!(
                    "text length {length} exceeds the limit of {max}"
                )));
            }
            let alphabet: Vec<char> = if second.is_empty() {
                DEFAULT_ALPHABET.chars().collect()
            } else {
                second.chars().collect()
            };
            Ok(random.with(|rng| {
                (0..length)
                    .map(|_| alphabet[rng.random_range(0..alphabet.len())])
                    .collect()
            }))
        }
        "number" => {
            let (min, max) = if second.trim().is_empty() {
                (0, parse_number(&first)?)
            } else {
                (parse_number(&first)?, parse_number(&second)?)
            };
            if min > max {
                return Err(TemplatingError::invalid_random(format!(
                    "number range {min}..{max} is empty"
                )));
            }
            Ok(random.with(|rng| rng.random_range(min..=max)).to_string())
        }
        "date" => {
            let from = parse_date(&first, (1, 1, 1))?;
            let to = parse_date(&second, (9999, 12, 31))?;
            if from > to {
                return Err(TemplatingError::invalid_random(format!(
                    "date range {from}..{to} is empty"
                )));
            }
            let span = u64::try_from((to - from).num_days()).unwrap_or(0);
            let offset = random.with(|rng| rng.random_range(0..=span));
            let date = from.checked_add_days(Days::new(offset)).unwrap_or(to);
            let format = arg(body, 5);
            let format = if format.trim().is_empty() {
                frame.engine.config.date_format.as_str()
            } else {
                format.as_str()
            };
            Ok(format_datetime(
                &date.and_time(NaiveTime::MIN).and_utc(),
                format,
                false,
            ))
        }
        "guid" => {
            let mut bytes = [0u8; 16];
            random.with(|rng| rng.fill_bytes(&mut bytes));
            Ok(uuid::Builder::from_random_bytes(bytes)
                .into_uuid()
                .to_string())
        }
        other => Err(TemplatingError::invalid_random(format!(
            "unknown random kind '{other}'"
        ))),
    }
}
