//! Fieldweave command-line interface.
//!
//! Commands:
//! - `fieldweave render`: render a template against one record of a YAML dataset
//! - `fieldweave tokens`: list the top-level tokens of a template
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, RenderArgs, TemplateSource};
