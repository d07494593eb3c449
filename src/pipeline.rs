//! Request pipeline
//!
//! One pass per submission: dispatch to the model, run the conversion tool
//! if it was requested, and fold every outcome (including every failure)
//! into a [`DispatchOutcome`].

use crate::dispatcher::{DispatchError, Dispatcher, ModelDecision};
use crate::rates::{ConversionResult, RateLookup};
use crate::tools::{ExchangeRateTool, ToolError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// The single value handed to presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DispatchOutcome {
    #[serde(rename = "conversion")]
    Conversion(ConversionResult),
    #[serde(rename = "general")]
    GeneralReply { content: String },
    #[serde(rename = "error")]
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Unknown tool call: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

pub struct Pipeline {
    dispatcher: Dispatcher,
    exchange_rate: ExchangeRateTool,
}

impl Pipeline {
    pub fn new(dispatcher: Dispatcher, rates: Arc<dyn RateLookup>) -> Self {
        Self {
            dispatcher,
            exchange_rate: ExchangeRateTool::new(rates),
        }
    }

    /// Run one submission. Never fails; faults become `DispatchOutcome::Error`.
    pub async fn run(&self, user_text: &str) -> DispatchOutcome {
        match self.try_run(user_text).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Pipeline failed");
                DispatchOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn try_run(&self, user_text: &str) -> Result<DispatchOutcome, PipelineError> {
        match self.dispatcher.dispatch(user_text).await? {
            ModelDecision::DirectAnswer(content) => Ok(DispatchOutcome::GeneralReply { content }),
            ModelDecision::ToolCall { name, arguments } => {
                if name != ExchangeRateTool::NAME {
                    return Err(PipelineError::UnknownTool(name));
                }
                let result = self.exchange_rate.run(&arguments).await?;
                Ok(DispatchOutcome::Conversion(result))
            }
        }
    }
}
