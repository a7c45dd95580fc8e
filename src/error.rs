use thiserror::Error;

/// A lookup that produced no representable result. HTTP status errors are not
/// faults; they come back as `DailyResult::Failed`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("rate lookup for {date} failed: {source}")]
    Fetch {
        date: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to send response: {0}")]
    Send(String),

    #[error("failed to append audit entry: {0}")]
    Audit(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host cannot be empty")]
    EmptyHost,

    #[error("port cannot be 0")]
    ZeroPort,

    #[error("upstream url cannot be empty")]
    EmptyUpstreamUrl,

    #[error("upstream timeout must be greater than 0")]
    ZeroTimeout,
}
