//! Provider pattern table.
//!
//! Rules are loaded from a CSV file (`provider,match_type,pattern,priority,notes`),
//! validated as a whole, then kept sorted by ascending priority. Rules sharing
//! a priority keep their file order, so the first one listed wins.

mod error;
mod loader;
mod types;

pub use error::PatternError;
pub use types::{MatchType, Matcher, PatternRule};

use std::path::Path;

use tracing::debug;

use types::normalize_host;

/// File name looked up next to the executable when no table path is given.
pub const DEFAULT_PATTERNS_FILE: &str = "provider_patterns.csv";

/// Immutable, priority-ordered set of provider rules.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Load and validate the table at `path`. A single bad row fails the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let path = path.as_ref();
        let table = Self::from_rules(loader::load_path(path)?);
        debug!(path = %path.display(), rules = table.len(), "pattern table loaded");
        Ok(table)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, PatternError> {
        Ok(Self::from_rules(loader::load_reader(reader)?))
    }

    /// Build a table from already validated rules, ordering them by priority.
    pub fn from_rules(mut rules: Vec<PatternRule>) -> Self {
        // stable: equal priorities keep their input order
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Provider of the first rule, in priority order, matched by any of `hosts`.
    pub fn classify<S: AsRef<str>>(&self, hosts: &[S]) -> Option<&str> {
        if hosts.is_empty() {
            return None;
        }
        let hosts: Vec<String> = hosts.iter().map(|h| normalize_host(h.as_ref())).collect();
        self.rules
            .iter()
            .find(|rule| hosts.iter().any(|host| rule.matcher.is_match(host)))
            .map(|rule| rule.provider.as_str())
    }
}

impl PatternRule {
    /// Build a single rule, compiling its matcher. Used when tables are
    /// assembled in code rather than read from CSV.
    pub fn new(
        provider: impl Into<String>,
        match_type: MatchType,
        pattern: impl Into<String>,
        priority: i64,
    ) -> Result<Self, PatternError> {
        let pattern = pattern.into();
        let matcher = loader::build_matcher(match_type, &pattern, 0)?;
        Ok(Self {
            provider: provider.into(),
            pattern,
            priority,
            notes: String::new(),
            matcher,
        })
    }
}
