//! Model dispatch: one chat completion, mapped to a decision
//!
//! The model alone decides whether a query needs the conversion tool
//! (`tool_choice = auto`); nothing here pre-classifies the input.

use crate::llm::{
    FinishReason, LlmError, LlmRequest, LlmService, SamplingParams, ToolChoice, ToolDefinition,
};
use crate::tools::ExchangeRateTool;
use std::sync::Arc;
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. If the user asks about currency conversion or exchange rates, use the get_exchange_rate function. For all other queries, respond directly.";

/// What the model chose to do with the user's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDecision {
    DirectAnswer(String),
    ToolCall { name: String, arguments: String },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Unexpected finish reason: {0}")]
    UnexpectedFinish(String),

    #[error("Model requested a tool call but supplied none")]
    MissingToolCall,
}

pub struct Dispatcher {
    llm: Arc<dyn LlmService>,
    tools: Vec<ToolDefinition>,
    sampling: SamplingParams,
}

impl Dispatcher {
    pub fn new(llm: Arc<dyn LlmService>, sampling: SamplingParams) -> Self {
        Self {
            llm,
            tools: vec![ExchangeRateTool::definition()],
            sampling,
        }
    }

    fn build_request(&self, user_text: &str) -> LlmRequest {
        LlmRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: user_text.to_string(),
            tools: self.tools.clone(),
            tool_choice: ToolChoice::Auto,
            sampling: self.sampling,
        }
    }

    /// Send `user_text` to the model and classify the reply.
    pub async fn dispatch(&self, user_text: &str) -> Result<ModelDecision, DispatchError> {
        let request = self.build_request(user_text);

        let response = self.llm.complete(&request).await.map_err(|e| {
            tracing::warn!(error = %e, kind = e.kind.as_str(), "Model call failed");
            DispatchError::from(e)
        })?;

        match response.finish_reason {
            FinishReason::Stop => Ok(ModelDecision::DirectAnswer(
                response.content.unwrap_or_default(),
            )),
            FinishReason::ToolCalls => {
                let call = response
                    .tool_calls
                    .into_iter()
                    .next()
                    .ok_or(DispatchError::MissingToolCall)?;
                tracing::debug!(call_id = %call.id, name = %call.name, "Model requested tool");
                Ok(ModelDecision::ToolCall {
                    name: call.name,
                    arguments: call.arguments,
                })
            }
            FinishReason::Other(reason) => Err(DispatchError::UnexpectedFinish(reason)),
        }
    }
}
