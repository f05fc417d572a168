use thiserror::Error;

/// Failures of the statistics feed.
///
/// The scanner branches on the variant: a rate limit pauses the whole loop,
/// anything else only backs off the affected match.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("rate limited by upstream (HTTP 429)")]
    RateLimited,
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("empty response")]
    Empty,
}

/// Failures of the outbound message channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("channel rejected message: {0}")]
    Rejected(String),
    #[error("send failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
