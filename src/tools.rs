//! Tools declared to the model
//!
//! Exactly one tool exists: `get_exchange_rate`. The model may request it,
//! and the pipeline executes it at most once per submission.

mod exchange_rate;

pub use exchange_rate::ExchangeRateTool;

use crate::rates::RateError;
use thiserror::Error;

/// Failure while executing a tool call
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Lookup(#[from] RateError),
}
