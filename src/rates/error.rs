//! Rate lookup error types

use thiserror::Error;

/// Failure of a single exchange-rate lookup
#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate lookup failed: could not reach provider: {0}")]
    Network(String),

    #[error("Rate lookup failed: provider did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Rate lookup failed: HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Rate lookup failed: provider reported {0}")]
    Provider(String),

    #[error("Rate lookup failed: malformed response: {0}")]
    Malformed(String),

    #[error("Rate lookup failed: {0}")]
    Client(String),
}
