use thiserror::Error;

/// Planning and tip-logging errors
///
/// Only `UnknownRegion` ever reaches a caller as a failure. The provider
/// variants are logged and absorbed into degraded output.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("live analysis provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("{layer} sampling failed: {reason}")]
    ProviderQueryFailed { layer: String, reason: String },

    #[error("live analysis of {0} produced no nodes")]
    EmptyLiveResult(String),

    #[error("config error: {0}")]
    Config(String),
}
