use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
pub const DEFAULT_WORKERS: usize = 20;

/// Resolver knobs shared by every lookup of a run.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// IP, `IP:port` or hostname. `None` uses the system configuration.
    pub nameserver: Option<String>,
    pub timeout: Duration,
    pub workers: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            nameserver: None,
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nameserver(mut self, nameserver: impl Into<String>) -> Self {
        self.nameserver = Some(nameserver.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Per-query deadline. A zero timeout disables it.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout.is_zero() {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Number of lookups allowed in flight, never below one.
    pub fn workers(&self) -> usize {
        self.workers.max(1)
    }
}
