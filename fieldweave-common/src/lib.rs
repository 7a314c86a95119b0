//! # Fieldweave Common
//!
//! Foundational pieces shared by every Fieldweave crate.
//!
//! ## Modules
//!
//! - [`error`] - Severity classification implemented by each crate's error enum
//! - [`logging`] - Helpers for rendering structured values inside `tracing` output

pub mod error;
pub mod logging;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
