//! `get_exchange_rate` tool: schema, argument validation, execution

use super::ToolError;
use crate::llm::ToolDefinition;
use crate::rates::{ConversionResult, RateLookup};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Validated arguments of a `get_exchange_rate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub base: String,
    pub target: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
struct RawArguments {
    base: String,
    target: String,
    amount: Value,
}

impl ConversionRequest {
    /// Parse the raw JSON argument string emitted by the model.
    ///
    /// Values are passed through unchanged; they are only checked. `amount`
    /// may arrive as a JSON number even though the schema says string.
    pub fn from_arguments(arguments: &str) -> Result<Self, ToolError> {
        let raw: RawArguments = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let amount = match raw.amount {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "amount must be a string, got {other}"
                )))
            }
        };

        let request = Self {
            base: raw.base,
            target: raw.target,
            amount,
        };
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), ToolError> {
        for (field, value) in [
            ("base", &self.base),
            ("target", &self.target),
            ("amount", &self.amount),
        ] {
            if value.trim().is_empty() {
                return Err(ToolError::InvalidArguments(format!("{field} is empty")));
            }
        }

        if is_plain_decimal(&self.amount) {
            Ok(())
        } else {
            Err(ToolError::InvalidArguments(format!(
                "amount {:?} is not a plain decimal number",
                self.amount
            )))
        }
    }
}

/// Digits with an optional fractional part: `100`, `12.50`. No sign,
/// exponent, or surrounding whitespace.
fn is_plain_decimal(s: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(s),
    }
}

/// Currency conversion backed by a [`RateLookup`]
pub struct ExchangeRateTool {
    rates: Arc<dyn RateLookup>,
}

impl ExchangeRateTool {
    pub const NAME: &'static str = "get_exchange_rate";

    pub fn new(rates: Arc<dyn RateLookup>) -> Self {
        Self { rates }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Convert a given amount of money from one currency to another. Each currency will be represented as a 3-letter code".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "base": {
                        "type": "string",
                        "description": "The base or original currency."
                    },
                    "target": {
                        "type": "string",
                        "description": "The target or converted currency"
                    },
                    "amount": {
                        "type": "string",
                        "description": "The amount of money to convert from the base currency."
                    }
                },
                "required": ["base", "target", "amount"],
                "additionalProperties": false
            }),
        }
    }

    /// Validate `arguments` and perform the lookup. Invalid arguments never
    /// reach the rate provider.
    pub async fn run(&self, arguments: &str) -> Result<ConversionResult, ToolError> {
        let request = ConversionRequest::from_arguments(arguments)?;
        tracing::debug!(
            base = %request.base,
            target = %request.target,
            amount = %request.amount,
            "Running exchange rate tool"
        );
        let result = self
            .rates
            .lookup_rate(&request.base, &request.target, &request.amount)
            .await?;
        Ok(result)
    }
}
