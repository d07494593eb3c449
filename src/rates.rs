//! Exchange-rate lookup against the exchangerate-api.com v6 pair endpoint

mod error;

pub use error::RateError;

use crate::config::RatesConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A completed conversion, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub base: String,
    pub target: String,
    pub amount: String,
    /// Converted amount with exactly two fractional digits
    #[serde(rename = "conversion_result")]
    pub converted_amount: String,
    #[serde(rename = "conversion_rate")]
    pub rate: f64,
}

/// Source of exchange rates
#[async_trait]
pub trait RateLookup: Send + Sync {
    async fn lookup_rate(
        &self,
        base: &str,
        target: &str,
        amount: &str,
    ) -> Result<ConversionResult, RateError>;
}

/// Client for `GET {endpoint}/v6/{key}/pair/{base}/{target}/{amount}`
pub struct ExchangeRateClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl ExchangeRateClient {
    pub fn new(config: &RatesConfig) -> Result<Self, RateError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RateError::Client(format!("failed to create HTTP client: {e}")))?;

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            RateError::Client(format!("invalid endpoint {:?}: {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(RateError::Client(format!(
                "invalid endpoint {:?}: not a base URL",
                config.endpoint
            )));
        }

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// Each value becomes exactly one percent-encoded path segment.
    fn pair_url(
        &self,
        key: &str,
        base: &str,
        target: &str,
        amount: &str,
    ) -> Result<Url, RateError> {
        for (field, value) in [("base", base), ("target", target), ("amount", amount)] {
            // `.` and `..` would be resolved away as dot segments.
            if matches!(value, "" | "." | "..") {
                return Err(RateError::Client(format!(
                    "{field} {value:?} is not a usable path segment"
                )));
            }
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| RateError::Client("endpoint is not a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v6", key, "pair", base, target, amount]);
        Ok(url)
    }

    fn transport_error(&self, e: reqwest::Error) -> RateError {
        if e.is_timeout() {
            RateError::Timeout(self.timeout)
        } else {
            // reqwest includes the URL in its message; strip it to keep the key out.
            RateError::Network(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl RateLookup for ExchangeRateClient {
    async fn lookup_rate(
        &self,
        base: &str,
        target: &str,
        amount: &str,
    ) -> Result<ConversionResult, RateError> {
        let url = self.pair_url(&self.api_key, base, target, amount)?;
        tracing::debug!(
            url = %self.pair_url("redacted", base, target, amount)?,
            "Requesting exchange rate"
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(status = status.as_u16(), body = %body, "Exchange API response");

        if !status.is_success() {
            let detail = serde_json::from_str::<PairResponse>(&body)
                .ok()
                .and_then(|r| r.error_type)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(RateError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: PairResponse = serde_json::from_str(&body)
            .map_err(|e| RateError::Malformed(format!("invalid JSON: {e}")))?;

        build_result(parsed, base, target, amount)
    }
}

/// Format a converted amount with two fractional digits, rounding to nearest.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

fn build_result(
    parsed: PairResponse,
    base: &str,
    target: &str,
    amount: &str,
) -> Result<ConversionResult, RateError> {
    if parsed.result.as_deref() == Some("error") {
        return Err(RateError::Provider(
            parsed.error_type.unwrap_or_else(|| "unknown-error".to_string()),
        ));
    }

    let converted = parsed
        .conversion_result
        .ok_or_else(|| RateError::Malformed("missing conversion_result".to_string()))?;
    let rate = parsed
        .conversion_rate
        .ok_or_else(|| RateError::Malformed("missing conversion_rate".to_string()))?;

    Ok(ConversionResult {
        base: base.to_string(),
        target: target.to_string(),
        amount: amount.to_string(),
        converted_amount: format_amount(converted),
        rate,
    })
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rate: Option<f64>,
    #[serde(default)]
    conversion_result: Option<f64>,
}
