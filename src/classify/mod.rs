//! Turns a [`ResolutionOutcome`] into a provider label.

use crate::input::DomainKey;
use crate::mx::{FailureKind, ResolutionOutcome};
use crate::patterns::PatternTable;

/// Label for domains whose MX hosts match no rule.
pub const CUSTOM_MX: &str = "Custom MX";
/// Prefix of every failure label, followed by the [`FailureKind`].
pub const BAD_DOMAIN_PREFIX: &str = "Bad Domain – ";

pub fn bad_domain_label(kind: FailureKind) -> String {
    format!("{BAD_DOMAIN_PREFIX}{kind}")
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub domain: DomainKey,
    pub provider_label: String,
    pub best_preference: Option<u16>,
    pub mx_hosts: Vec<String>,
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Whether the domain belongs in the review queue.
    pub fn is_bad_domain(&self) -> bool {
        self.provider_label.starts_with(BAD_DOMAIN_PREFIX)
    }
}

/// Pure: the same outcome and table always give the same result.
pub fn classify(
    domain: &DomainKey,
    outcome: &ResolutionOutcome,
    table: &PatternTable,
) -> ClassificationResult {
    match outcome {
        ResolutionOutcome::Resolved {
            best_preference,
            hosts,
        } => ClassificationResult {
            domain: domain.clone(),
            provider_label: table
                .classify(hosts.as_slice())
                .unwrap_or(CUSTOM_MX)
                .to_string(),
            best_preference: Some(*best_preference),
            mx_hosts: hosts.clone(),
            error: None,
        },
        ResolutionOutcome::Failure { kind, detail } => ClassificationResult {
            domain: domain.clone(),
            provider_label: bad_domain_label(*kind),
            best_preference: None,
            mx_hosts: Vec::new(),
            error: Some(detail.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{MatchType, PatternRule};

    fn google_table() -> PatternTable {
        PatternTable::from_rules(vec![
            PatternRule::new("Google Workspace", MatchType::Suffix, "aspmx.l.google.com", 10)
                .expect("rule"),
        ])
    }

    fn key(domain: &str) -> DomainKey {
        DomainKey::parse(domain).expect("domain")
    }

    #[test]
    fn matched_hosts_take_the_provider_name() {
        let outcome = ResolutionOutcome::Resolved {
            best_preference: 1,
            hosts: vec!["aspmx.l.google.com".to_string()],
        };
        let result = classify(&key("foo.com"), &outcome, &google_table());
        assert_eq!(result.provider_label, "Google Workspace");
        assert_eq!(result.best_preference, Some(1));
        assert_eq!(result.error, None);
        assert!(!result.is_bad_domain());
    }

    #[test]
    fn unmatched_hosts_are_custom_mx() {
        let outcome = ResolutionOutcome::Resolved {
            best_preference: 10,
            hosts: vec!["mail.foo.com".to_string()],
        };
        let result = classify(&key("foo.com"), &outcome, &google_table());
        assert_eq!(result.provider_label, "Custom MX");
        assert_eq!(result.mx_hosts, vec!["mail.foo.com".to_string()]);
    }

    #[test]
    fn failures_become_bad_domain_labels() {
        let outcome = ResolutionOutcome::failure(FailureKind::NoMx, "lookup returned no MX records");
        let result = classify(&key("foo.com"), &outcome, &google_table());
        assert_eq!(result.provider_label, "Bad Domain – NoMX");
        assert_eq!(result.best_preference, None);
        assert!(result.mx_hosts.is_empty());
        assert_eq!(result.error.as_deref(), Some("lookup returned no MX records"));
        assert!(result.is_bad_domain());
    }

    #[test]
    fn null_mx_label() {
        insta::assert_snapshot!(bad_domain_label(FailureKind::NullMx), @"Bad Domain – NullMX");
    }

    #[test]
    fn classification_is_deterministic() {
        let outcome = ResolutionOutcome::Resolved {
            best_preference: 5,
            hosts: vec!["mx.other.test".to_string(), "aspmx.l.google.com".to_string()],
        };
        let table = google_table();
        let first = classify(&key("foo.com"), &outcome, &table);
        for _ in 0..10 {
            assert_eq!(classify(&key("foo.com"), &outcome, &table), first);
        }
    }
}
