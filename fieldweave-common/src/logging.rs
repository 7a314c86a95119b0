//! Logging utilities for Fieldweave
//!
//! This module provides utilities for formatting values inside log messages.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// Use this in tracing statements to format records, configuration or any
/// other serializable value as YAML with a newline before the content:
///
/// ```ignore
/// use fieldweave_common::Pretty;
/// use tracing::debug;
///
/// debug!("Loaded record: {}", Pretty(&record));
/// ```
///
/// Debug is used as a fallback if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
