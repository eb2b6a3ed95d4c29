use std::fmt;

use super::domain::extract_domain;

/// Lower-cased ASCII domain used as the unit of resolution.
///
/// `Foo.COM`, `foo.com.` and `alice@foo.com` all produce the key `foo.com`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainKey(String);

impl DomainKey {
    /// Parse a bare domain or an e-mail address. `None` when the value does
    /// not yield a syntactically valid domain.
    pub fn parse(value: &str) -> Option<Self> {
        extract_domain(value).ok().map(Self)
    }

    pub(crate) fn from_normalized(domain: String) -> Self {
        Self(domain)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One input entry. Duplicates are kept so that record counts can be
/// reported next to domain counts.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 0-based index among the extracted records.
    pub position: usize,
    /// 1-based line of the input file.
    pub line: u64,
    /// Original text the domain was taken from (line, token or cell).
    pub raw: String,
    pub domain: DomainKey,
}

impl RawRecord {
    pub fn new(position: usize, line: u64, raw: impl Into<String>, domain: DomainKey) -> Self {
        Self {
            position,
            line,
            raw: raw.into(),
            domain,
        }
    }

    /// Build a record straight from a value, e.g. an address given on the
    /// command line.
    pub fn parse(position: usize, value: &str) -> Option<Self> {
        let domain = DomainKey::parse(value)?;
        Some(Self::new(position, position as u64 + 1, value.trim(), domain))
    }
}
