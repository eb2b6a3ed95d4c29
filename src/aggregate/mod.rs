//! Run orchestration: resolve every unique domain once through a bounded
//! pool of concurrent lookups, classify, then join the labels back onto the
//! raw records and count them per provider.

mod types;

pub use types::{Classifications, ProviderTally, RunReport};

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::classify::classify;
use crate::input::{DomainKey, RawRecord};
use crate::mx::{self, LookupMx, MxResolver, ResolutionOutcome, ResolverOptions};
use crate::patterns::PatternTable;

/// Classify `records` with a resolver built from `options`.
///
/// Only resolver construction can fail; per-domain DNS failures end up in the
/// report as Bad-Domain classifications.
pub async fn run(
    records: &[RawRecord],
    table: &PatternTable,
    options: &ResolverOptions,
) -> Result<RunReport, mx::Error> {
    let resolver = MxResolver::new(options)?;
    Ok(run_with(records, table, &resolver, options).await)
}

pub(crate) async fn run_with<R>(
    records: &[RawRecord],
    table: &PatternTable,
    resolver: &R,
    options: &ResolverOptions,
) -> RunReport
where
    R: LookupMx,
{
    let domains = unique_domains(records);
    let workers = options.workers();
    let timeout = options.timeout();
    info!(
        records = records.len(),
        domains = domains.len(),
        workers,
        "resolving MX records"
    );

    let mut outcomes: Vec<(usize, ResolutionOutcome)> = stream::iter(domains.iter().enumerate())
        .map(|(idx, domain)| async move {
            let outcome = mx::resolve_with(resolver, domain.as_str(), timeout).await;
            (idx, outcome)
        })
        .buffer_unordered(workers)
        .collect()
        .await;
    outcomes.sort_by_key(|(idx, _)| *idx);

    let classifications: Classifications = outcomes
        .iter()
        .map(|(idx, outcome)| classify(domains[*idx], outcome, table))
        .collect();

    let tallies = tally(records, &classifications);
    let failed = classifications.review_queue().count();
    info!(
        domains = classifications.len(),
        providers = tallies.len(),
        failed,
        "classification complete"
    );

    RunReport {
        tallies,
        classifications,
    }
}

/// Unique domains of `records`, in first-seen order.
pub fn unique_domains(records: &[RawRecord]) -> Vec<&DomainKey> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| &record.domain)
        .filter(|domain| seen.insert(*domain))
        .collect()
}

/// Count records and distinct domains per provider label.
///
/// Sorted by descending `record_count`, then ascending provider name.
pub fn tally(records: &[RawRecord], classifications: &Classifications) -> Vec<ProviderTally> {
    let mut by_provider: HashMap<&str, ProviderTally> = HashMap::new();
    let mut counted: HashSet<&DomainKey> = HashSet::new();

    for record in records {
        let Some(result) = classifications.get(&record.domain) else {
            warn!(domain = %record.domain, "record without classification");
            continue;
        };
        let entry = by_provider
            .entry(result.provider_label.as_str())
            .or_insert_with(|| ProviderTally {
                provider: result.provider_label.clone(),
                domain_count: 0,
                record_count: 0,
            });
        entry.record_count += 1;
        if counted.insert(&record.domain) {
            entry.domain_count += 1;
        }
    }

    let mut tallies: Vec<ProviderTally> = by_provider.into_values().collect();
    tallies.sort_by(|a, b| {
        b.record_count
            .cmp(&a.record_count)
            .then_with(|| a.provider.cmp(&b.provider))
    });
    tallies
}

#[cfg(test)]
mod tests;
