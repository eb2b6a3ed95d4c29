use std::collections::HashMap;

use crate::classify::ClassificationResult;
use crate::input::DomainKey;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTally {
    pub provider: String,
    /// Distinct domains classified under `provider`.
    pub domain_count: usize,
    /// Input records, duplicates included.
    pub record_count: usize,
}

/// Write-once `DomainKey -> ClassificationResult` mapping iterating in
/// first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Classifications {
    entries: Vec<ClassificationResult>,
    index: HashMap<DomainKey, usize>,
}

impl Classifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns `false` and keeps the existing entry when the domain is
    /// already present.
    pub fn insert(&mut self, result: ClassificationResult) -> bool {
        if self.index.contains_key(&result.domain) {
            return false;
        }
        self.index.insert(result.domain.clone(), self.entries.len());
        self.entries.push(result);
        true
    }

    pub fn get(&self, domain: &DomainKey) -> Option<&ClassificationResult> {
        self.index.get(domain).map(|idx| &self.entries[*idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassificationResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bad-Domain results, in first-seen order.
    pub fn review_queue(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.entries.iter().filter(|result| result.is_bad_domain())
    }
}

impl<'a> IntoIterator for &'a Classifications {
    type Item = &'a ClassificationResult;
    type IntoIter = std::slice::Iter<'a, ClassificationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ClassificationResult> for Classifications {
    fn from_iter<I: IntoIterator<Item = ClassificationResult>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        for result in iter {
            out.insert(result);
        }
        out
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tallies: Vec<ProviderTally>,
    pub classifications: Classifications,
}

impl RunReport {
    pub fn total_records(&self) -> usize {
        self.tallies.iter().map(|t| t.record_count).sum()
    }

    pub fn total_domains(&self) -> usize {
        self.tallies.iter().map(|t| t.domain_count).sum()
    }
}
