//! Runtime configuration
//!
//! Everything is read once in `main` and handed to the clients explicitly.

use crate::llm::SamplingParams;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL_ENDPOINT: &str = "https://models.inference.ai.azure.com";
pub const DEFAULT_MODEL_NAME: &str = "mistral-small-2503";
pub const DEFAULT_RATES_ENDPOINT: &str = "https://v6.exchangerate-api.com";

const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_RATES_TIMEOUT: Duration = Duration::from_secs(10);

const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
const TOP_P_RANGE: RangeInclusive<f32> = 0.0..=1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Chat-completion endpoint settings
#[derive(Clone)]
pub struct ModelConfig {
    pub endpoint: String,
    pub token: String,
    pub model_name: String,
    pub sampling: SamplingParams,
    pub timeout: Duration,
}

/// Exchange-rate provider settings
#[derive(Clone)]
pub struct RatesConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub rates: RatesConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let defaults = SamplingParams::default();
        let sampling = SamplingParams {
            temperature: parse_in_range_or(
                &get,
                "FX_TEMPERATURE",
                defaults.temperature,
                TEMPERATURE_RANGE,
            )?,
            top_p: parse_in_range_or(&get, "FX_TOP_P", defaults.top_p, TOP_P_RANGE)?,
            max_tokens: parse_in_range_or(
                &get,
                "FX_MAX_TOKENS",
                defaults.max_tokens,
                1..=u32::MAX,
            )?,
        };

        let model = ModelConfig {
            endpoint: get("FX_MODEL_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_MODEL_ENDPOINT.to_string()),
            token: required("GITHUB_TOKEN")?,
            model_name: get("FX_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            sampling,
            timeout: parse_secs_or(&get, "FX_MODEL_TIMEOUT_SECS", DEFAULT_MODEL_TIMEOUT)?,
        };

        let rates = RatesConfig {
            endpoint: get("FX_RATES_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_RATES_ENDPOINT.to_string()),
            api_key: required("EXCHANGERATE_API_KEY")?,
            timeout: parse_secs_or(&get, "FX_RATES_TIMEOUT_SECS", DEFAULT_RATES_TIMEOUT)?,
        };

        Ok(Self { model, rates })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Like [`parse_or`], but the value must also fall inside `range`.
/// NaN is never inside a range, so it is rejected along with infinities.
fn parse_in_range_or<T, G>(
    get: &G,
    name: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + fmt::Display,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, name, default)?;
    if range.contains(&value) {
        return Ok(value);
    }
    Err(ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: format!("must be between {} and {}", range.start(), range.end()),
    })
}

fn parse_secs_or<G>(get: &G, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(get, name, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

// Secrets stay out of Debug output so configs can be logged.
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("sampling", &self.sampling)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for RatesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatesConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
