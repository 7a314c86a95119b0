//! `<iif|value1|operator|value2|trueResult|falseResult>`

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::arg;
use crate::engine::Frame;
use crate::error::{Result, TemplatingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    fn parse(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "ne" | "neq" => Ok(Operator::Ne),
            "lt" => Ok(Operator::Lt),
            "gt" => Ok(Operator::Gt),
            "le" => Ok(Operator::Le),
            "ge" => Ok(Operator::Ge),
            _ => Err(TemplatingError::InvalidOperator {
                operator: text.to_string(),
            }),
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}

/// Empty text counts as zero.
fn as_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(text).ok()
}

/// Numeric when both sides are numbers, ordinal otherwise.
fn compare(left: &str, right: &str) -> Ordering {
    match (as_number(left), as_number(right)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => left.cmp(right),
    }
}

pub(crate) fn evaluate(frame: &Frame<'_>, body: &str) -> Result<String> {
    let operator = Operator::parse(&arg(body, 3))?;
    let left = frame.render_nested(frame.record, &arg(body, 2))?;
    let right = frame.render_nested(frame.record, &arg(body, 4))?;

    let outcome = operator.holds(compare(&left, &right));
    frame.log(format!("iif '{left}' {operator:?} '{right}' is {outcome}"));

    let branch = if outcome { arg(body, 5) } else { arg(body, 6) };
    frame.render_nested(frame.record, &branch)
}
