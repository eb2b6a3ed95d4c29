use std::fmt;

/// Exchange published as the root name by a null MX (RFC 7505).
pub const NULL_MX_EXCHANGE: &str = ".";

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.exchange == NULL_MX_EXCHANGE
    }
}

/// Why a domain could not be mapped to a usable MX set.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The lookup succeeded but carried no MX record.
    NoMx,
    NxDomain,
    Timeout,
    /// No nameserver could give an authoritative answer (SERVFAIL, REFUSED, unreachable).
    NoNameservers,
    /// NODATA: the name exists but has no MX RRset.
    NoAnswer,
    NullMx,
    /// Any other resolver error; the raw text is kept as detail.
    DnsError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoMx => "NoMX",
            Self::NxDomain => "NXDOMAIN",
            Self::Timeout => "Timeout",
            Self::NoNameservers => "NoNameservers",
            Self::NoAnswer => "NoAnswer",
            Self::NullMx => "NullMX",
            Self::DnsError => "DnsError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one MX query, reduced to the best-preference host set.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved {
        best_preference: u16,
        /// Sorted, deduplicated exchanges sharing `best_preference`.
        hosts: Vec<String>,
    },
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl ResolutionOutcome {
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failure { kind, .. } => Some(*kind),
            Self::Resolved { .. } => None,
        }
    }
}
