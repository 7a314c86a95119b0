//! Severity classification for Fieldweave errors
//!
//! Each crate owns its own `thiserror` enum. This module only provides the
//! shared vocabulary used to decide how loudly a failure is reported.

/// Severity levels for error classification
///
/// - **Warning**: The render continues; the failure was degraded to an empty value.
/// - **Error**: The current operation failed but callers can keep going.
/// - **Critical**: Configuration or input is unusable; stop and fix it first.
///
/// # Examples
///
/// ```rust
/// use fieldweave_common::ErrorSeverity;
///
/// // A suppressed relationship hop degrades to an empty value
/// let suppressed = ErrorSeverity::Warning;
///
/// // An invalid iif operator aborts the render
/// let hard = ErrorSeverity::Error;
///
/// assert_ne!(suppressed, hard);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the caller can continue with other work
    Error,

    /// Cannot continue without intervention
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use fieldweave_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum LoadError {
///     Corrupted,
///     Missing,
///     Empty,
/// }
///
/// impl Severity for LoadError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             LoadError::Corrupted => ErrorSeverity::Critical,
///             LoadError::Missing => ErrorSeverity::Error,
///             LoadError::Empty => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(LoadError::Corrupted.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}
