//! `<PowerFx|expression>`
//!
//! The expression is rendered first, so it may embed field tokens, then
//! handed to a [`FormulaEvaluator`]. The default evaluator runs the
//! expression as CEL against one process-wide base context.

use cel_interpreter::{Context, Program, Value as CelValue};
use once_cell::sync::Lazy;

use crate::engine::Frame;
use crate::error::{Result, TemplatingError};
use crate::scanner::after_first_part;

/// External expression evaluator for formula tokens.
pub trait FormulaEvaluator: Send + Sync {
    /// Evaluate `expression`, returning its printed result or an error message.
    fn evaluate(&self, expression: &str) -> std::result::Result<String, String>;
}

static BASE_CONTEXT: Lazy<Context<'static>> = Lazy::new(Context::default);

/// Evaluates formulas as CEL expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelFormula;

impl FormulaEvaluator for CelFormula {
    fn evaluate(&self, expression: &str) -> std::result::Result<String, String> {
        let program =
            Program::compile(expression).map_err(|e| format!("CEL compilation error: {}", e))?;
        let value = program
            .execute(&BASE_CONTEXT)
            .map_err(|e| format!("CEL execution error: {}", e))?;
        Ok(cel_value_to_text(&value))
    }
}

fn cel_value_to_text(value: &CelValue) -> String {
    match value {
        CelValue::Int(i) => i.to_string(),
        CelValue::UInt(u) => u.to_string(),
        CelValue::Float(f) => f.to_string(),
        CelValue::Bool(b) => b.to_string(),
        CelValue::String(s) => s.to_string(),
        CelValue::Null => String::new(),
        other => format!("{:?}", other),
    }
}

pub(crate) fn evaluate(frame: &Frame<'_>, body: &str) -> Result<String> {
    let expression = frame.render_nested(frame.record, after_first_part(body, "|"))?;
    frame.log(format!("formula: {expression}"));
    frame
        .engine
        .formula
        .evaluate(&expression)
        .map_err(|message| TemplatingError::Formula {
            expression,
            message,
        })
}
