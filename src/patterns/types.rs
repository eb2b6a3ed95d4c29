use std::fmt;

use regex::Regex;

/// How a rule's pattern is compared against an MX hostname.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Suffix,
    Contains,
    Exact,
    Regex,
}

impl MatchType {
    /// Parse a `match_type` column value (trimmed, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "suffix" => Some(Self::Suffix),
            "contains" => Some(Self::Contains),
            "exact" => Some(Self::Exact),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Contains => "contains",
            Self::Exact => "exact",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled predicate of a rule. Literal patterns are stored lower-cased
/// without trailing dot; regexes are compiled case-insensitive.
#[derive(Debug, Clone)]
pub enum Matcher {
    Suffix(String),
    Contains(String),
    Exact(String),
    Regex(Regex),
}

impl Matcher {
    pub fn match_type(&self) -> MatchType {
        match self {
            Self::Suffix(_) => MatchType::Suffix,
            Self::Contains(_) => MatchType::Contains,
            Self::Exact(_) => MatchType::Exact,
            Self::Regex(_) => MatchType::Regex,
        }
    }

    /// `host` must already be normalized with [`normalize_host`].
    pub(crate) fn is_match(&self, host: &str) -> bool {
        match self {
            Self::Suffix(pattern) => host.ends_with(pattern.as_str()),
            Self::Contains(pattern) => host.contains(pattern.as_str()),
            Self::Exact(pattern) => host == pattern,
            Self::Regex(re) => re.is_match(host),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    pub provider: String,
    /// Pattern text as written in the table.
    pub pattern: String,
    pub priority: i64,
    pub notes: String,
    pub matcher: Matcher,
}

impl PatternRule {
    pub fn match_type(&self) -> MatchType {
        self.matcher.match_type()
    }

    pub fn matches(&self, host: &str) -> bool {
        self.matcher.is_match(&normalize_host(host))
    }
}

pub(crate) fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}
