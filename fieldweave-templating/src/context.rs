//! Per-render options and shared render state

use std::sync::Mutex;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Options threaded through one top-level render.
///
/// Nested renders (conditional operands and branches, expand children,
/// the current user's record) run with [`RenderOptions::nested`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Running number substituted into `[#start|format]` placeholders; 0 disables them
    pub sequence: u64,
    /// Only tokens prefixed `scope:` are consumed when non-empty
    pub scope: String,
    /// Resolve failed relationship hops to empty text instead of failing
    pub suppress_path_errors: bool,
    /// Literal replacements applied to every resolved field value, in order
    pub replace_patterns: Option<IndexMap<String, String>>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_suppress_path_errors(mut self, suppress: bool) -> Self {
        self.suppress_path_errors = suppress;
        self
    }

    pub fn with_replace_patterns(mut self, patterns: IndexMap<String, String>) -> Self {
        self.replace_patterns = Some(patterns);
        self
    }

    /// Options for a sub-expression: unscoped, no sequence, everything else inherited.
    pub fn nested(&self) -> Self {
        Self {
            sequence: 0,
            scope: String::new(),
            suppress_path_errors: self.suppress_path_errors,
            replace_patterns: self.replace_patterns.clone(),
        }
    }

    /// Apply the replacement map to a resolved value.
    pub(crate) fn apply_replacements(&self, value: String) -> String {
        match &self.replace_patterns {
            Some(patterns) => patterns
                .iter()
                .filter(|(from, _)| !from.is_empty())
                .fold(value, |acc, (from, to)| acc.replace(from.as_str(), to)),
            None => value,
        }
    }
}

/// The random number source shared by every render on an engine.
#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// A deterministic source, for tests and reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Run `f` with exclusive access to the generator.
    pub fn with<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn nested_resets_scope_and_sequence() {
        let mut patterns = IndexMap::new();
        patterns.insert("&".to_string(), "and".to_string());
        let options = RenderOptions::new()
            .with_sequence(7)
            .with_scope("outer")
            .with_suppress_path_errors(true)
            .with_replace_patterns(patterns.clone());

        let nested = options.nested();
        assert_eq!(nested.sequence, 0);
        assert_eq!(nested.scope, "");
        assert!(nested.suppress_path_errors);
        assert_eq!(nested.replace_patterns, Some(patterns));
    }

    #[test]
    fn replacements_apply_in_order() {
        let mut patterns = IndexMap::new();
        patterns.insert("a".to_string(), "b".to_string());
        patterns.insert("b".to_string(), "c".to_string());
        let options = RenderOptions::new().with_replace_patterns(patterns);
        assert_eq!(options.apply_replacements("ab".to_string()), "cc");
        assert_eq!(RenderOptions::new().apply_replacements("ab".into()), "ab");
    }

    #[test]
    fn seeded_sources_repeat() {
        let a = RandomSource::seeded(42);
        let b = RandomSource::seeded(42);
        let xs: Vec<u32> = (0..4).map(|_| a.with(|rng| rng.random())).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.with(|rng| rng.random())).collect();
        assert_eq!(xs, ys);
    }
}
