//! Section-scoped render logging
//!
//! The engine reports what it is doing through a [`RenderLogger`]: every
//! render opens a section, handlers log into the innermost one, and the
//! section is closed when the render returns. Logging never affects the
//! rendered output.

use std::sync::Mutex;

use tracing::debug;

/// Hierarchical, section-scoped log sink.
pub trait RenderLogger: Send + Sync {
    fn start_section(&self, name: &str);
    fn log(&self, message: &str);
    fn end_section(&self);
}

/// Forwards render log lines to `tracing` at debug level.
///
/// Open sections are kept on a stack and attached to each event as a
/// `/`-joined `section` field.
#[derive(Debug, Default)]
pub struct TracingLogger {
    sections: Mutex<Vec<String>>,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn path(&self) -> String {
        let sections = self.sections.lock().unwrap_or_else(|e| e.into_inner());
        sections.join("/")
    }
}

impl RenderLogger for TracingLogger {
    fn start_section(&self, name: &str) {
        let mut sections = self.sections.lock().unwrap_or_else(|e| e.into_inner());
        sections.push(name.to_string());
    }

    fn log(&self, message: &str) {
        debug!(section = %self.path(), "{message}");
    }

    fn end_section(&self) {
        let mut sections = self.sections.lock().unwrap_or_else(|e| e.into_inner());
        sections.pop();
    }
}

/// Collects log lines in memory, indented by section depth.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    depth: usize,
    lines: Vec<String>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn lines(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.lines.clone()
    }

    /// True if any logged line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl RenderLogger for MemoryLogger {
    fn start_section(&self, name: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let line = format!("{}[{name}]", "  ".repeat(state.depth));
        state.lines.push(line);
        state.depth += 1;
    }

    fn log(&self, message: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let line = format!("{}{message}", "  ".repeat(state.depth));
        state.lines.push(line);
    }

    fn end_section(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.depth = state.depth.saturating_sub(1);
    }
}

/// Closes a logger section when dropped, so early returns still balance it.
pub(crate) struct SectionGuard<'a> {
    logger: &'a dyn RenderLogger,
}

impl<'a> SectionGuard<'a> {
    pub(crate) fn open(logger: &'a dyn RenderLogger, name: &str) -> Self {
        logger.start_section(name);
        Self { logger }
    }
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        self.logger.end_section();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_indents_by_section() {
        let logger = MemoryLogger::new();
        logger.start_section("Render");
        logger.log("scanning");
        logger.start_section("Expand");
        logger.log("3 children");
        logger.end_section();
        logger.end_section();
        logger.log("done");

        assert_eq!(
            logger.lines(),
            vec!["[Render]", "  scanning", "  [Expand]", "    3 children", "done"]
        );
    }

    #[test]
    fn section_guard_closes_on_drop() {
        let logger = MemoryLogger::new();
        {
            let _section = SectionGuard::open(&logger, "Outer");
            logger.log("inside");
        }
        logger.log("outside");
        assert_eq!(logger.lines(), vec!["[Outer]", "  inside", "outside"]);
    }

    #[test]
    fn tracing_logger_tracks_path() {
        let logger = TracingLogger::new();
        logger.start_section("Render");
        logger.start_section("Field");
        assert_eq!(logger.path(), "Render/Field");
        logger.end_section();
        logger.end_section();
        logger.end_section();
        assert_eq!(logger.path(), "");
    }
}
