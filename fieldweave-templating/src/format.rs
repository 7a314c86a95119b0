//! Number and date formatting
//!
//! Templates carry .NET-style format strings (`N2`, `#,##0.00`,
//! `dd MMM yyyy`). Numbers are formatted with `rust_decimal`, dates are
//! translated to `chrono` strftime. Output is culture-invariant.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Widest zero padding a `D` format may request.
pub const MAX_PAD_WIDTH: usize = 1024;

/// Format a number with a standard (`N2`, `F0`, `D5`, `P1`) or custom
/// (`#,##0.00`, `000`) format string. An empty format prints the plain value.
///
/// ```
/// use fieldweave_templating::format::format_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number(Decimal::new(12345678, 3), "N2"), "12,345.68");
/// assert_eq!(format_number(Decimal::from(7), "000"), "007");
/// ```
pub fn format_number(value: Decimal, format: &str) -> String {
    let format = format.trim();
    if format.is_empty() {
        return value.normalize().to_string();
    }
    match standard_number_format(value, format) {
        Some(text) => text,
        None => custom_number_format(value, format),
    }
}

fn standard_number_format(value: Decimal, format: &str) -> Option<String> {
    let mut chars = format.chars();
    let spec = chars.next()?.to_ascii_uppercase();
    let digits = chars.as_str();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let precision: Option<u32> = if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    };

    let text = match spec {
        'N' => fixed(value, precision.unwrap_or(2), true),
        'F' => fixed(value, precision.unwrap_or(2), false),
        'D' => {
            let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let whole = fixed(rounded, 0, false);
            let (negative, digits) = split_sign(&whole);
            let width = (precision.unwrap_or(0) as usize).min(MAX_PAD_WIDTH);
            format!(
                "{}{:0>width$}",
                if negative { "-" } else { "" },
                digits,
                width = width
            )
        }
        'P' => match value.checked_mul(Decimal::ONE_HUNDRED) {
            Some(percent) => format!("{} %", fixed(percent, precision.unwrap_or(2), true)),
            None => value.normalize().to_string(),
        },
        _ => return None,
    };
    Some(text)
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

/// `value` rounded to exactly `scale` decimals, optionally with thousands groups.
fn fixed(value: Decimal, scale: u32, grouped: bool) -> String {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    let text = rounded.to_string();
    if !grouped {
        return text;
    }
    let (negative, unsigned) = split_sign(&text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn custom_number_format(value: Decimal, format: &str) -> String {
    let is_placeholder = |c: char| c == '0' || c == '#';
    let (Some(first), Some(last)) = (format.find(is_placeholder), format.rfind(is_placeholder))
    else {
        return format.to_string();
    };
    let prefix = &format[..first];
    let suffix = &format[last + 1..];
    let pattern = &format[first..=last];

    let (int_pattern, frac_pattern) = pattern.split_once('.').unwrap_or((pattern, ""));
    let grouped = int_pattern.contains(',');
    let min_int = int_pattern.chars().filter(|c| *c == '0').count();
    let min_frac = frac_pattern.chars().filter(|c| *c == '0').count();
    let max_frac = min_frac + frac_pattern.chars().filter(|c| *c == '#').count();

    let text = fixed(value, max_frac as u32, false);
    let (negative, unsigned) = split_sign(&text);
    let (int_digits, frac_digits) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut int_digits = int_digits.trim_start_matches('0').to_string();
    if int_digits.len() < min_int {
        int_digits = format!("{:0>width$}", int_digits, width = min_int);
    }
    if grouped {
        int_digits = group_thousands(&int_digits);
    }

    let mut frac_digits = frac_digits.to_string();
    while frac_digits.len() > min_frac && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let mut out = String::from(prefix);
    if negative && (!int_digits.is_empty() || !frac_digits.is_empty()) {
        out.push('-');
    }
    out.push_str(&int_digits);
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        out.push('0');
    }
    out.push_str(suffix);
    out
}

/// Expand the single-letter standard date patterns.
fn standard_date_pattern(format: &str) -> &str {
    match format {
        "d" => "MM/dd/yyyy",
        "D" => "dddd, dd MMMM yyyy",
        "f" => "dddd, dd MMMM yyyy HH:mm",
        "F" => "dddd, dd MMMM yyyy HH:mm:ss",
        "g" => "MM/dd/yyyy HH:mm",
        "G" => "MM/dd/yyyy HH:mm:ss",
        "s" => "yyyy'-'MM'-'dd'T'HH':'mm':'ss",
        "t" => "HH:mm",
        "T" => "HH:mm:ss",
        "u" => "yyyy'-'MM'-'dd HH':'mm':'ss'Z'",
        other => other,
    }
}

const DATE_TOKENS: [(&str, &str); 19] = [
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("dd", "%d"),
    ("d", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("tt", "%p"),
];

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Translate a .NET custom date format into a chrono strftime string.
///
/// Formats that already contain `%` are taken to be strftime and returned as is.
pub fn translate_date_format(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }
    let format = standard_date_pattern(format);
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'scan: while let Some(c) = rest.chars().next() {
        if c == '\'' || c == '"' {
            let body = &rest[1..];
            let (literal, remaining) = match body.find(c) {
                Some(close) => (&body[..close], &body[close + 1..]),
                None => (body, ""),
            };
            literal.chars().for_each(|l| push_literal(&mut out, l));
            rest = remaining;
            continue;
        }
        if c == '\\' {
            let mut chars = rest[1..].chars();
            if let Some(escaped) = chars.next() {
                push_literal(&mut out, escaped);
            }
            rest = chars.as_str();
            continue;
        }
        if let Some(stripped) = rest.strip_prefix("fff") {
            out.push_str("%3f");
            rest = stripped.trim_start_matches('f');
            continue;
        }
        for (token, strftime) in DATE_TOKENS {
            if let Some(stripped) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = stripped;
                continue 'scan;
            }
        }
        push_literal(&mut out, c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Format a timestamp with a .NET or strftime format, in UTC or local time.
///
/// An invalid strftime string falls back to RFC 3339.
pub fn format_datetime(value: &DateTime<Utc>, format: &str, local_time: bool) -> String {
    let pattern = translate_date_format(format);
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        return value.to_rfc3339();
    }
    let mut out = String::new();
    let written = if local_time {
        write!(out, "{}", value.with_timezone(&Local).format(&pattern))
    } else {
        write!(out, "{}", value.format(&pattern))
    };
    match written {
        Ok(()) => out,
        Err(_) => value.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[rstest]
    #[case("1234.5", "", "1234.5")]
    #[case("1234.5", "N", "1,234.50")]
    #[case("1234567.891", "N2", "1,234,567.89")]
    #[case("-1234.5", "N0", "-1,235")]
    #[case("0.125", "F2", "0.13")]
    #[case("3", "F1", "3.0")]
    #[case("42", "D5", "00042")]
    #[case("-42", "D4", "-0042")]
    #[case("0.256", "P1", "25.6 %")]
    #[case("102", "000", "102")]
    #[case("5", "000", "005")]
    #[case("1234.5", "#,##0.00", "1,234.50")]
    #[case("0.5", "#.##", ".5")]
    #[case("0", "#.##", "0")]
    #[case("12.3456", "0.0#", "12.35")]
    #[case("12", "0.0#", "12.0")]
    #[case("7", "Item #", "Item 7")]
    #[case("9.5", "$0.00 USD", "$9.50 USD")]
    #[case("-0.001", "0.00", "0.00")]
    #[case("5", "abc", "abc")]
    #[case("12", "0 €", "12 €")]
    #[case("1234.5", "#,##0.00 kr ø", "1,234.50 kr ø")]
    fn numbers(#[case] value: &str, #[case] format: &str, #[case] expected: &str) {
        assert_eq!(format_number(dec(value), format), expected);
    }

    #[test]
    fn percent_of_huge_values_does_not_overflow() {
        let big = dec("1000000000000000000000000000");
        assert_eq!(format_number(big, "P"), "1000000000000000000000000000");
        assert_eq!(format_number(Decimal::MAX, "P0"), Decimal::MAX.to_string());
    }

    #[test]
    fn zero_padding_is_capped() {
        let padded = format_number(Decimal::from(7), "D999999999");
        assert_eq!(padded.len(), MAX_PAD_WIDTH);
        assert!(padded.ends_with("07"));
        let negative = format_number(Decimal::from(-7), "D999999999");
        assert_eq!(negative.len(), MAX_PAD_WIDTH + 1);
        assert!(negative.starts_with("-0"));
    }

    #[rstest]
    #[case("yyyy-MM-dd HH:mm", "%Y-%m-%d %H:%M")]
    #[case("dd MMM yyyy", "%d %b %Y")]
    #[case("d/M/yy h:mm tt", "%-d/%-m/%y %-I:%M %p")]
    #[case("HH:mm:ss.fff", "%H:%M:%S.%3f")]
    #[case("'Day' d", "Day %-d")]
    #[case("yyyy\\y", "%Yy")]
    #[case("100% %Y", "100% %Y")]
    #[case("d", "%m/%d/%Y")]
    fn date_translation(#[case] format: &str, #[case] expected: &str) {
        assert_eq!(translate_date_format(format), expected);
    }

    #[test]
    fn datetimes_in_utc() {
        let value = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_datetime(&value, "yyyy-MM-dd HH:mm", false), "2024-03-09 14:05");
        assert_eq!(format_datetime(&value, "dddd d MMMM", false), "Saturday 9 March");
        assert_eq!(format_datetime(&value, "hh:mm tt", false), "02:05 PM");
        assert_eq!(format_datetime(&value, "%Y/%m", false), "2024/03");
    }

    #[test]
    fn invalid_strftime_falls_back() {
        let value = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_datetime(&value, "%Q", false), value.to_rfc3339());
    }
}
