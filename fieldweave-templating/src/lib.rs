//! Record-driven template engine for Fieldweave
//!
//! Renders format strings such as
//!
//! ```text
//! {name} owned by {ownerid.fullname}: <expand|contact|parentcustomerid|{fullname}|fullname|, >
//! ```
//!
//! against a [`fieldweave_fields::Record`], reading related records and
//! field metadata through the [`fieldweave_fields::RecordAccess`] and
//! [`fieldweave_fields::MetadataAccess`] collaborators.
//!
//! # Token syntax
//!
//! - `{[scope:]path[|format]}`: a field, optionally through references
//! - `<expand|child|relation|format|order|separator|distinct|activeOnly|maxCount>`
//! - `<iif|value1|operator|value2|trueResult|falseResult>`
//! - `<system|now|today|user|char|format>`
//! - `<random|text|number|date|guid|...>`
//! - `<PowerFx|expression>`
//! - `[#start|format]`: sequence placeholder, rewritten after all tokens
//! - `<system|char|{>` / `<system|char|}>`: literal braces
//!
//! # Architecture
//!
//! - **Scanner**: depth-aware token and argument extraction ([`next_token`], [`separated_part`])
//! - **Dispatcher**: [`TemplateEngine`] routes each token by [`TokenKind`] and splices the result
//! - **Handlers**: one module per token kind, recursing into the engine for sub-expressions
//! - **Limits**: template size, render depth and path hops are bounded ([`EngineConfig`])

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod handlers;
pub mod limits;
pub mod logging;
pub mod scanner;
pub mod sequence;
pub mod token;

pub use config::EngineConfig;
pub use context::{RandomSource, RenderOptions};
pub use engine::{TemplateEngine, TemplateEngineBuilder};
pub use error::{Result, TemplatingError};
pub use handlers::formula::{CelFormula, FormulaEvaluator};
pub use logging::{MemoryLogger, RenderLogger, TracingLogger};
pub use scanner::{next_token, separated_part, top_level_tokens, TokenSpan};
pub use token::TokenKind;
