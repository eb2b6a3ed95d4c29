#![forbid(unsafe_code)]
//! mxprovider_lib — classification des domaines e-mail par infrastructure MX
//!
//! Pipeline: [`input`] records → [`aggregate::run`] (one MX lookup per unique
//! domain, bounded concurrency) → [`classify`] against a [`PatternTable`] →
//! per-provider [`ProviderTally`] rows, written out by [`report`].

pub mod aggregate;
pub mod classify;
pub mod input;
pub mod mx;
pub mod patterns;
pub mod report;

pub use aggregate::{Classifications, ProviderTally, RunReport, run, tally};
pub use classify::{BAD_DOMAIN_PREFIX, CUSTOM_MX, ClassificationResult, classify};
pub use input::{DomainKey, InputError, RawRecord, read_records, read_records_from_path};
pub use mx::{
    Error as MxError, FailureKind, MxRecord, MxResolver, ResolutionOutcome, ResolverOptions,
};
pub use patterns::{MatchType, PatternError, PatternRule, PatternTable};
pub use report::{ReportError, ReportKind};
