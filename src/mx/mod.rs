//! DNS MX resolution.
//!
//! [`MxResolver`] performs one asynchronous MX query per domain against the
//! configured nameserver and reduces the answer to a [`ResolutionOutcome`]:
//! either the best-preference host set or a typed [`FailureKind`]. DNS
//! failures are returned as data, never as errors; [`Error`] only covers
//! resolver construction.

mod error;
mod options;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use options::{DEFAULT_TIMEOUT, DEFAULT_WORKERS, ResolverOptions};
pub use resolver::MxResolver;
pub use types::{FailureKind, MxRecord, NULL_MX_EXCHANGE, ResolutionOutcome};

pub(crate) use resolver::{LookupMx, resolve_with};
