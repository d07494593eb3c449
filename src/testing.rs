//! Mock implementations for testing
//!
//! Queue-driven fakes for the model and the rate provider, so the pipeline
//! can be exercised without network I/O.

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::rates::{format_amount, ConversionResult, RateError, RateLookup};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

// ============================================================================
// Mock Rate Lookup
// ============================================================================

/// Provider-side numbers for one queued lookup
pub struct MockQuote {
    pub conversion_result: f64,
    pub conversion_rate: f64,
}

/// Mock rate provider that answers from a queue and records every call
pub struct MockRateLookup {
    quotes: Mutex<VecDeque<Result<MockQuote, RateError>>>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl MockRateLookup {
    pub fn new() -> Self {
        Self {
            quotes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_quote(&self, conversion_result: f64, conversion_rate: f64) {
        self.quotes.lock().unwrap().push_back(Ok(MockQuote {
            conversion_result,
            conversion_rate,
        }));
    }

    pub fn queue_error(&self, error: RateError) {
        self.quotes.lock().unwrap().push_back(Err(error));
    }

    /// `(base, target, amount)` of every lookup, in order
    pub fn recorded_calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockRateLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLookup for MockRateLookup {
    async fn lookup_rate(
        &self,
        base: &str,
        target: &str,
        amount: &str,
    ) -> Result<ConversionResult, RateError> {
        self.calls
            .lock()
            .unwrap()
            .push((base.to_string(), target.to_string(), amount.to_string()));

        let quote = self
            .quotes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RateError::Network("No mock quote queued".to_string())))?;

        Ok(ConversionResult {
            base: base.to_string(),
            target: target.to_string(),
            amount: amount.to_string(),
            converted_amount: format_amount(quote.conversion_result),
            rate: quote.conversion_rate,
        })
    }
}
