use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::{error::ProtoErrorKind, op::ResponseCode},
    system_conf::read_system_conf,
};

use crate::input::DomainKey;

use super::{Error, FailureKind, MxRecord, NULL_MX_EXCHANGE, ResolutionOutcome, ResolverOptions};

const DNS_PORT: u16 = 53;

/// Asynchronous MX resolver bound to one nameserver configuration.
pub struct MxResolver {
    inner: TokioAsyncResolver,
    timeout: Option<Duration>,
}

impl MxResolver {
    /// Build a resolver for `options.nameserver`, or the system configuration
    /// when none is set. Each query gets a single attempt.
    pub fn new(options: &ResolverOptions) -> Result<Self, Error> {
        let (config, mut opts) = match options.nameserver.as_deref() {
            Some(nameserver) => (nameserver_config(nameserver)?, ResolverOpts::default()),
            None => read_system_conf().map_err(Error::resolver_init)?,
        };
        if let Some(timeout) = options.timeout() {
            opts.timeout = timeout;
        }
        opts.attempts = 1;

        debug!(
            nameserver = options.nameserver.as_deref().unwrap_or("system"),
            timeout_ms = opts.timeout.as_millis() as u64,
            "MX resolver ready"
        );

        Ok(Self {
            inner: TokioAsyncResolver::tokio(config, opts),
            timeout: options.timeout(),
        })
    }

    pub async fn resolve(&self, domain: &DomainKey) -> ResolutionOutcome {
        resolve_with(self, domain.as_str(), self.timeout).await
    }
}

/// Query `domain` through `resolver`, bounded by `timeout`, and reduce the
/// answer to a [`ResolutionOutcome`]. Never fails: DNS errors become data.
pub(crate) async fn resolve_with<R>(
    resolver: &R,
    domain: &str,
    timeout: Option<Duration>,
) -> ResolutionOutcome
where
    R: LookupMx,
{
    let lookup = resolver.lookup_mx(domain);
    let answer = match timeout {
        Some(limit) => match tokio::time::timeout(limit, lookup).await {
            Ok(answer) => answer,
            Err(_) => Err(DnsFailure::new(
                FailureKind::Timeout,
                format!("no answer within {:.1}s", limit.as_secs_f64()),
            )),
        },
        None => lookup.await,
    };

    let outcome = match answer {
        Ok(records) => select_best(records),
        Err(failure) => ResolutionOutcome::failure(failure.kind, failure.detail),
    };

    match &outcome {
        ResolutionOutcome::Failure {
            kind: FailureKind::DnsError,
            detail,
        } => warn!(domain, %detail, "unexpected resolver error"),
        ResolutionOutcome::Failure { kind, .. } => debug!(domain, %kind, "MX lookup failed"),
        ResolutionOutcome::Resolved {
            best_preference,
            hosts,
        } => debug!(domain, best_preference, hosts = hosts.len(), "MX resolved"),
    }
    outcome
}

/// Keep only the records sharing the lowest preference value.
pub(crate) fn select_best(mut records: Vec<MxRecord>) -> ResolutionOutcome {
    if records.is_empty() {
        return ResolutionOutcome::failure(FailureKind::NoMx, "lookup returned no MX records");
    }

    records.sort();
    records.dedup();

    if records.iter().all(MxRecord::is_null) {
        return ResolutionOutcome::failure(
            FailureKind::NullMx,
            "domain publishes a null MX (RFC 7505)",
        );
    }
    records.retain(|record| !record.is_null());

    let best_preference = records[0].preference;
    let hosts = records
        .iter()
        .take_while(|record| record.preference == best_preference)
        .map(|record| record.exchange.clone())
        .collect();

    ResolutionOutcome::Resolved {
        best_preference,
        hosts,
    }
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    if trimmed.is_empty() {
        NULL_MX_EXCHANGE.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Failure of a single lookup, before it becomes a [`ResolutionOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DnsFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl DnsFailure {
    pub(crate) fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn from_resolve_error(err: &ResolveError) -> Self {
        let kind = match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                kind_for_response_code(*response_code)
            }
            ResolveErrorKind::NoConnections => FailureKind::NoNameservers,
            ResolveErrorKind::Timeout => FailureKind::Timeout,
            ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
                FailureKind::Timeout
            }
            _ => FailureKind::DnsError,
        };
        Self::new(kind, err.to_string())
    }
}

pub(crate) fn kind_for_response_code(code: ResponseCode) -> FailureKind {
    match code {
        ResponseCode::NXDomain => FailureKind::NxDomain,
        ResponseCode::NoError => FailureKind::NoAnswer,
        ResponseCode::ServFail | ResponseCode::Refused => FailureKind::NoNameservers,
        _ => FailureKind::DnsError,
    }
}

pub(crate) trait LookupMx {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsFailure>;
}

impl LookupMx for MxResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsFailure> {
        // fully qualified so search domains are never appended
        let fqdn = format!("{domain}.");
        let lookup = self
            .inner
            .mx_lookup(fqdn.as_str())
            .await
            .map_err(|err| DnsFailure::from_resolve_error(&err))?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}

fn nameserver_config(value: &str) -> Result<ResolverConfig, Error> {
    let addrs = nameserver_addrs(value)?;
    let port = addrs[0].port();
    let ips: Vec<IpAddr> = addrs
        .iter()
        .filter(|addr| addr.port() == port)
        .map(SocketAddr::ip)
        .collect();
    let group = NameServerConfigGroup::from_ips_clear(&ips, port, true);
    Ok(ResolverConfig::from_parts(None, Vec::new(), group))
}

/// Accepts `IP`, `IP:port`, `[v6]:port` or a hostname (port 53).
pub(crate) fn nameserver_addrs(value: &str) -> Result<Vec<SocketAddr>, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_nameserver(value, "empty value"));
    }
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(vec![addr]);
    }
    if let Ok(ip) = trimmed.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, DNS_PORT)]);
    }

    let addrs: Vec<SocketAddr> = (trimmed, DNS_PORT)
        .to_socket_addrs()
        .map_err(|err| Error::invalid_nameserver(value, err.to_string()))?
        .collect();
    if addrs.is_empty() {
        return Err(Error::invalid_nameserver(value, "hostname has no address"));
    }
    Ok(addrs)
}

#[cfg(test)]
impl LookupMx for crate::mx::tests::StubResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsFailure> {
        self.lookup(domain).await
    }
}
