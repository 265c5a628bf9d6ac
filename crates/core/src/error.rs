use thiserror::Error;

/// Top-level error type used across the dashboard crates.
///
/// Invalid sample values are not errors: they are dropped at the aggregator
/// entry point and never reach this type.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("config error: {0}")]
    Config(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("decode error: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;
