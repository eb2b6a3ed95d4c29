use thiserror::Error;

#[derive(Debug, Error)]
pub enum MxError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("invalid nameserver '{value}': {reason}")]
    InvalidNameserver { value: String, reason: String },
}

impl MxError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn invalid_nameserver(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidNameserver {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
