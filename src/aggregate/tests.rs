use std::time::Duration;

use proptest::prelude::*;

use super::{Classifications, ProviderTally, run_with, tally, unique_domains};
use crate::classify::ClassificationResult;
use crate::input::{DomainKey, RawRecord};
use crate::mx::tests::StubResolver;
use crate::mx::{FailureKind, MxRecord, ResolverOptions};
use crate::patterns::PatternTable;

const PATTERNS: &str = "\
provider,match_type,pattern,priority,notes
Google Workspace,suffix,aspmx.l.google.com,10,
Google Workspace,suffix,googlemail.com,10,
Microsoft 365,suffix,mail.protection.outlook.com,10,
Mimecast,contains,mimecast,20,
";

fn table() -> PatternTable {
    PatternTable::from_reader(PATTERNS.as_bytes()).expect("table loads")
}

fn records(values: &[&str]) -> Vec<RawRecord> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| RawRecord::parse(idx, value).expect("valid input"))
        .collect()
}

fn tally_of<'a>(tallies: &'a [ProviderTally], provider: &str) -> &'a ProviderTally {
    tallies
        .iter()
        .find(|t| t.provider == provider)
        .unwrap_or_else(|| panic!("no tally for {provider}: {tallies:?}"))
}

fn key(domain: &str) -> DomainKey {
    DomainKey::parse(domain).expect("domain")
}

fn result(domain: &str, provider: &str) -> ClassificationResult {
    ClassificationResult {
        domain: key(domain),
        provider_label: provider.to_string(),
        best_preference: Some(10),
        mx_hosts: vec![format!("mx.{domain}")],
        error: None,
    }
}

#[tokio::test]
async fn end_to_end_google_and_nxdomain() {
    let input = records(&["alice@foo.com", "bob@foo.com", "baz@bar.org"]);
    let stub = StubResolver::new()
        .with_records("foo.com", vec![MxRecord::new(10, "aspmx.l.google.com")])
        .with_failure("bar.org", FailureKind::NxDomain);

    let report = run_with(&input, &table(), &stub, &ResolverOptions::default()).await;

    assert_eq!(
        report.tallies,
        vec![
            ProviderTally {
                provider: "Google Workspace".to_string(),
                domain_count: 1,
                record_count: 2,
            },
            ProviderTally {
                provider: "Bad Domain – NXDOMAIN".to_string(),
                domain_count: 1,
                record_count: 1,
            },
        ]
    );

    let bar = report.classifications.get(&key("bar.org")).expect("bar.org classified");
    assert!(bar.is_bad_domain());
    assert!(bar.error.is_some());
    assert_eq!(report.classifications.review_queue().count(), 1);
}

#[tokio::test]
async fn each_unique_domain_is_resolved_once() {
    let input = records(&[
        "a@foo.com",
        "b@FOO.com",
        "foo.com.",
        "c@bar.org",
        "d@bar.org",
        "baz.net",
    ]);
    let stub = StubResolver::new()
        .with_records("foo.com", vec![MxRecord::new(10, "aspmx.l.google.com")])
        .with_records("bar.org", vec![MxRecord::new(5, "mx.bar.org")])
        .with_records("baz.net", vec![MxRecord::new(1, "baz-net.mail.protection.outlook.com")]);

    let report = run_with(&input, &table(), &stub, &ResolverOptions::default()).await;

    assert_eq!(stub.calls("foo.com"), 1);
    assert_eq!(stub.calls("bar.org"), 1);
    assert_eq!(stub.calls("baz.net"), 1);
    assert_eq!(stub.total_calls(), 3);
    assert_eq!(report.total_records(), input.len());
    assert_eq!(report.total_domains(), 3);
    assert_eq!(report.classifications.len(), 3);
}

#[tokio::test]
async fn classifications_follow_first_seen_order() {
    let input = records(&["z@zeta.test", "a@alpha.test", "z2@zeta.test", "m@mid.test"]);
    let stub = StubResolver::new()
        .with_records("zeta.test", vec![MxRecord::new(10, "mx.zeta.test")])
        .with_records("alpha.test", vec![MxRecord::new(10, "mx.alpha.test")])
        .with_records("mid.test", vec![MxRecord::new(10, "mx.mid.test")]);

    let report = run_with(&input, &table(), &stub, &ResolverOptions::default()).await;

    let order: Vec<&str> = report
        .classifications
        .iter()
        .map(|r| r.domain.as_str())
        .collect();
    assert_eq!(order, vec!["zeta.test", "alpha.test", "mid.test"]);
}

#[tokio::test]
async fn failure_kinds_are_labelled() {
    let input = records(&[
        "a@nomx.test",
        "a@null.test",
        "a@slow.test",
        "a@servfail.test",
        "a@nodata.test",
        "a@custom.test",
    ]);
    let stub = StubResolver::new()
        .with_records("nomx.test", Vec::new())
        .with_records("null.test", vec![MxRecord::new(0, ".")])
        .with_failure("slow.test", FailureKind::Timeout)
        .with_failure("servfail.test", FailureKind::NoNameservers)
        .with_failure("nodata.test", FailureKind::NoAnswer)
        .with_records("custom.test", vec![MxRecord::new(10, "mail.custom.test")]);

    let report = run_with(&input, &table(), &stub, &ResolverOptions::default()).await;
    let label = |domain: &str| {
        report
            .classifications
            .get(&key(domain))
            .map(|r| r.provider_label.clone())
            .unwrap_or_default()
    };

    assert_eq!(label("nomx.test"), "Bad Domain – NoMX");
    assert_eq!(label("null.test"), "Bad Domain – NullMX");
    assert_eq!(label("slow.test"), "Bad Domain – Timeout");
    assert_eq!(label("servfail.test"), "Bad Domain – NoNameservers");
    assert_eq!(label("nodata.test"), "Bad Domain – NoAnswer");
    assert_eq!(label("custom.test"), "Custom MX");
}

#[tokio::test]
async fn best_preference_set_drives_classification() {
    let input = records(&["a@split.test"]);
    let stub = StubResolver::new().with_records(
        "split.test",
        vec![
            MxRecord::new(10, "mxa.split.test"),
            MxRecord::new(10, "mxb.split.test"),
            MxRecord::new(20, "split-test.mail.protection.outlook.com"),
        ],
    );

    let report = run_with(&input, &table(), &stub, &ResolverOptions::default()).await;
    let result = report.classifications.get(&key("split.test")).expect("classified");

    assert_eq!(result.best_preference, Some(10));
    assert_eq!(result.mx_hosts, vec!["mxa.split.test", "mxb.split.test"]);
    assert_eq!(result.provider_label, "Custom MX");
}

#[tokio::test(start_paused = true)]
async fn worker_bound_is_respected() {
    let names: Vec<String> = (0..25).map(|i| format!("user@d{i}.test")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let input = records(&refs);

    let mut stub = StubResolver::new().with_delay(Duration::from_millis(200));
    for i in 0..25 {
        stub = stub.with_records(&format!("d{i}.test"), vec![MxRecord::new(10, "mx.d.test")]);
    }

    let options = ResolverOptions::default().with_workers(4);
    let report = run_with(&input, &table(), &stub, &options).await;

    assert_eq!(report.classifications.len(), 25);
    assert!(stub.max_in_flight() <= 4, "max in flight {}", stub.max_in_flight());
    assert!(stub.max_in_flight() >= 2);
}

#[tokio::test(start_paused = true)]
async fn deadline_applies_per_lookup() {
    let input = records(&["a@one.test", "b@two.test"]);
    let stub = StubResolver::new()
        .with_records("one.test", vec![MxRecord::new(10, "aspmx.l.google.com")])
        .with_records("two.test", vec![MxRecord::new(10, "aspmx.l.google.com")])
        .with_delay(Duration::from_secs(2));

    // both lookups take 2s: a 1s deadline fails both, 3s lets both through
    let tight = ResolverOptions::default().with_timeout(Duration::from_secs(1));
    let report = run_with(&input, &table(), &stub, &tight).await;
    assert_eq!(tally_of(&report.tallies, "Bad Domain – Timeout").domain_count, 2);

    let relaxed = ResolverOptions::default().with_timeout(Duration::from_secs(3));
    let report = run_with(&input, &table(), &stub, &relaxed).await;
    assert_eq!(tally_of(&report.tallies, "Google Workspace").record_count, 2);
}

#[test]
fn tally_sorts_by_record_count_then_name() {
    let input = records(&[
        "a@one.test",
        "b@two.test",
        "c@three.test",
        "d@three.test",
        "e@four.test",
    ]);
    let classifications: Classifications = [
        result("one.test", "Zeta"),
        result("two.test", "Alpha"),
        result("three.test", "Mimecast"),
        result("four.test", "Beta"),
    ]
    .into_iter()
    .collect();

    let tallies = tally(&input, &classifications);
    let order: Vec<(&str, usize)> = tallies
        .iter()
        .map(|t| (t.provider.as_str(), t.record_count))
        .collect();
    assert_eq!(
        order,
        vec![("Mimecast", 2), ("Alpha", 1), ("Beta", 1), ("Zeta", 1)]
    );
}

#[test]
fn classifications_are_write_once() {
    let mut classifications = Classifications::new();
    assert!(classifications.insert(result("one.test", "First")));
    assert!(!classifications.insert(result("one.test", "Second")));
    assert_eq!(
        classifications
            .get(&key("one.test"))
            .map(|r| r.provider_label.as_str()),
        Some("First")
    );
}

#[test]
fn unique_domains_keep_first_seen_order() {
    let input = records(&["b.test", "a.test", "b.test", "c.test", "a.test"]);
    let order: Vec<&str> = unique_domains(&input).iter().map(|d| d.as_str()).collect();
    assert_eq!(order, vec!["b.test", "a.test", "c.test"]);
}

proptest! {
    #[test]
    fn tally_counts_add_up(picks in proptest::collection::vec(0usize..6, 1..60)) {
        let providers = ["Google Workspace", "Microsoft 365", "Custom MX"];
        let values: Vec<String> = picks.iter().map(|i| format!("user@d{i}.test")).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let input = records(&refs);

        let classifications: Classifications = unique_domains(&input)
            .into_iter()
            .map(|domain| {
                let idx = domain.as_str().as_bytes()[1] as usize % providers.len();
                result(domain.as_str(), providers[idx])
            })
            .collect();

        let tallies = tally(&input, &classifications);
        let records_total: usize = tallies.iter().map(|t| t.record_count).sum();
        let domains_total: usize = tallies.iter().map(|t| t.domain_count).sum();
        prop_assert_eq!(records_total, input.len());
        prop_assert_eq!(domains_total, classifications.len());
    }
}
