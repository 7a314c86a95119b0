//! Template engine and token dispatch
//!
//! A render repeatedly asks the scanner for the next token, hands it to the
//! handler for its [`TokenKind`] and splices the handler's value over the
//! token's span. Values are guarded before splicing: their delimiters become
//! private placeholders so substituted text is never scanned as a token.
//! Once no token is left the guards are lifted, literal-brace escapes are
//! restored and, at the top level, sequence placeholders are rewritten.

use std::sync::Arc;

use fieldweave_fields::{MetadataAccess, Record, RecordAccess};
use tracing::trace;

use crate::config::EngineConfig;
use crate::context::{RandomSource, RenderOptions};
use crate::error::Result;
use crate::handlers::{conditional, expand, fields, formula, random, system};
use crate::handlers::formula::{CelFormula, FormulaEvaluator};
use crate::limits::{check_render_depth, validate_template_size};
use crate::logging::{RenderLogger, SectionGuard, TracingLogger};
use crate::scanner::next_token;
use crate::sequence::rewrite_sequences;
use crate::token::TokenKind;

const GUARDS: [(char, char); 4] = [
    ('{', '\u{F8F0}'),
    ('}', '\u{F8F1}'),
    ('<', '\u{F8F4}'),
    ('>', '\u{F8F5}'),
];
const LITERAL_OPEN: &str = "\u{F8F2}";
const LITERAL_CLOSE: &str = "\u{F8F3}";

/// Renders templates against records.
///
/// An engine is cheap to share: collaborators are held behind `Arc` and a
/// render never mutates engine state apart from drawing from the random
/// source.
///
/// ```rust,ignore
/// let engine = TemplateEngine::builder(records, metadata).build();
/// let text = engine.render(&account, "{name} owned by {ownerid.fullname}")?;
/// ```
pub struct TemplateEngine {
    pub(crate) records: Arc<dyn RecordAccess>,
    pub(crate) metadata: Arc<dyn MetadataAccess>,
    pub(crate) formula: Arc<dyn FormulaEvaluator>,
    pub(crate) logger: Arc<dyn RenderLogger>,
    pub(crate) random: Arc<RandomSource>,
    pub(crate) config: EngineConfig,
}

/// Builder for [`TemplateEngine`]. Created by [`TemplateEngine::builder`].
pub struct TemplateEngineBuilder {
    records: Arc<dyn RecordAccess>,
    metadata: Arc<dyn MetadataAccess>,
    formula: Option<Arc<dyn FormulaEvaluator>>,
    logger: Option<Arc<dyn RenderLogger>>,
    random: Option<Arc<RandomSource>>,
    config: EngineConfig,
}

impl TemplateEngineBuilder {
    /// Evaluator for `<PowerFx|...>` tokens. Defaults to [`CelFormula`].
    pub fn with_formula(mut self, formula: Arc<dyn FormulaEvaluator>) -> Self {
        self.formula = Some(formula);
        self
    }

    /// Render log sink. Defaults to [`TracingLogger`].
    pub fn with_logger(mut self, logger: Arc<dyn RenderLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Random source for `<random|...>` tokens. Defaults to an OS-seeded source.
    pub fn with_random(mut self, random: Arc<RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TemplateEngine {
        TemplateEngine {
            records: self.records,
            metadata: self.metadata,
            formula: self.formula.unwrap_or_else(|| Arc::new(CelFormula)),
            logger: self
                .logger
                .unwrap_or_else(|| Arc::new(TracingLogger::new())),
            random: self
                .random
                .unwrap_or_else(|| Arc::new(RandomSource::from_entropy())),
            config: self.config,
        }
    }
}

impl TemplateEngine {
    pub fn builder(
        records: Arc<dyn RecordAccess>,
        metadata: Arc<dyn MetadataAccess>,
    ) -> TemplateEngineBuilder {
        TemplateEngineBuilder {
            records,
            metadata,
            formula: None,
            logger: None,
            random: None,
            config: EngineConfig::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render `text` against `record` with default options.
    pub fn render(&self, record: &Record, text: &str) -> Result<String> {
        self.render_with_options(record, &RenderOptions::default(), text)
    }

    /// Render `text` against `record`.
    ///
    /// Hard failures abort the whole render; no partial output is returned.
    pub fn render_with_options(
        &self,
        record: &Record,
        options: &RenderOptions,
        text: &str,
    ) -> Result<String> {
        validate_template_size(text, self.config.max_template_size)?;
        Frame {
            engine: self,
            record,
            options,
            depth: 0,
        }
        .render(text)
    }
}

/// One render invocation: the record, its options and how deeply it is nested.
pub(crate) struct Frame<'a> {
    pub(crate) engine: &'a TemplateEngine,
    pub(crate) record: &'a Record,
    pub(crate) options: &'a RenderOptions,
    depth: usize,
}

impl Frame<'_> {
    fn render(&self, text: &str) -> Result<String> {
        check_render_depth(self.depth, self.engine.config.max_render_depth)?;
        let _section = SectionGuard::open(self.engine.logger.as_ref(), "Render");
        self.log(format!(
            "{} {} (scope '{}', sequence {})",
            self.record.entity, self.record.id, self.options.scope, self.options.sequence
        ));

        let scope = self.options.scope.as_str();
        let mut buffer = unescape_html(&mask_literal_braces(text, scope), scope);

        while let Some(span) = next_token(&buffer, scope) {
            let body = span.body(&buffer).to_string();
            trace!(kind = %span.kind, token = span.text(&buffer), "dispatching token");
            let value = self.dispatch(span.kind, &body)?;
            buffer.replace_range(span.start..span.end, &guard(&value));
        }

        let mut output = unmask_literal_braces(&unguard(&buffer));
        if self.options.sequence > 0 {
            output = rewrite_sequences(&output, self.options.sequence);
        }
        Ok(output)
    }

    fn dispatch(&self, kind: TokenKind, body: &str) -> Result<String> {
        match kind {
            TokenKind::Field => {
                fields::resolve(self, body).map(|value| self.options.apply_replacements(value))
            }
            TokenKind::Expand => expand::expand(self, body),
            TokenKind::Conditional => conditional::evaluate(self, body),
            TokenKind::System => system::evaluate(self, body),
            TokenKind::Random => random::generate(self, body),
            TokenKind::Formula => formula::evaluate(self, body),
        }
    }

    /// Render a sub-expression against `record` with nested options.
    pub(crate) fn render_nested(&self, record: &Record, text: &str) -> Result<String> {
        let options = self.options.nested();
        Frame {
            engine: self.engine,
            record,
            options: &options,
            depth: self.depth + 1,
        }
        .render(text)
    }

    pub(crate) fn log(&self, message: impl AsRef<str>) {
        self.engine.logger.log(message.as_ref());
    }

    pub(crate) fn section(&self, name: &str) -> SectionGuard<'_> {
        SectionGuard::open(self.engine.logger.as_ref(), name)
    }
}

fn guard(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            GUARDS
                .iter()
                .find(|(plain, _)| *plain == c)
                .map_or(c, |(_, masked)| *masked)
        })
        .collect()
}

fn unguard(text: &str) -> String {
    text.chars()
        .map(|c| {
            GUARDS
                .iter()
                .find(|(_, masked)| *masked == c)
                .map_or(c, |(plain, _)| *plain)
        })
        .collect()
}

fn literal_brace_tokens(scope: &str) -> Vec<(String, &'static str)> {
    let mut prefixes = vec![String::new()];
    if !scope.is_empty() {
        prefixes.push(format!("{scope}:"));
    }
    prefixes
        .into_iter()
        .flat_map(|prefix| {
            [
                (format!("<{prefix}system|char|{{>"), LITERAL_OPEN),
                (format!("<{prefix}system|char|}}>"), LITERAL_CLOSE),
            ]
        })
        .collect()
}

fn mask_literal_braces(text: &str, scope: &str) -> String {
    literal_brace_tokens(scope)
        .into_iter()
        .fold(text.to_string(), |acc, (token, placeholder)| {
            acc.replace(&token, placeholder)
        })
}

fn unmask_literal_braces(text: &str) -> String {
    text.replace(LITERAL_OPEN, "{").replace(LITERAL_CLOSE, "}")
}

/// Turn `&lt;name|` back into `<name|` for known functions; if any were
/// found, every `&gt;` is decoded as well.
fn unescape_html(text: &str, scope: &str) -> String {
    if !text.contains("&lt;") {
        return text.to_string();
    }
    let mut out = text.to_string();
    let mut found = false;
    for name in TokenKind::FUNCTIONS.iter().filter_map(|kind| kind.function_name()) {
        let mut prefixes = vec![name.to_string()];
        if !scope.is_empty() {
            prefixes.push(format!("{scope}:{name}"));
        }
        for prefix in prefixes {
            let escaped = format!("&lt;{prefix}|");
            if out.contains(&escaped) {
                out = out.replace(&escaped, &format!("<{prefix}|"));
                found = true;
            }
        }
    }
    if found {
        out = out.replace("&gt;", ">");
    }
    out
}
