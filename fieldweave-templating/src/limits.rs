//! Resource limits for rendering
//!
//! Templates are rendered recursively and traverse caller-supplied record
//! graphs, so the engine bounds template size, nested render depth and the
//! number of relationship hops a single field path may take.

use crate::error::{Result, TemplatingError};

/// Default maximum template size in bytes
pub const MAX_TEMPLATE_SIZE: usize = 1024 * 1024;

/// Default maximum number of nested render invocations
pub const MAX_RENDER_DEPTH: usize = 32;

/// Default maximum number of relationship hops in one field path
pub const MAX_PATH_HOPS: usize = 16;

/// Reject templates larger than `max` bytes before scanning them.
pub fn validate_template_size(template: &str, max: usize) -> Result<()> {
    if template.len() > max {
        return Err(TemplatingError::TemplateTooLarge {
            size: template.len(),
            max,
        });
    }
    Ok(())
}

/// Fail once a nested render would exceed `max` levels.
pub fn check_render_depth(depth: usize, max: usize) -> Result<()> {
    if depth > max {
        return Err(TemplatingError::NestingTooDeep { depth, max });
    }
    Ok(())
}
