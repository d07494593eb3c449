//! fx-assistant - a terminal assistant with live currency conversion
//!
//! Questions go to a hosted chat model. When the model asks for the
//! `get_exchange_rate` tool the conversion is looked up on
//! exchangerate-api.com and shown instead of a text reply.

mod config;
mod dispatcher;
mod llm;
mod pipeline;
mod rates;
mod render;
mod session;
#[cfg(test)]
mod testing;
mod tools;

use config::AppConfig;
use crossterm::tty::IsTty;
use dispatcher::Dispatcher;
use llm::{LoggingService, OpenAIService};
use pipeline::Pipeline;
use rates::ExchangeRateClient;
use render::Renderer;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; credentials may come from the environment.
    let _ = dotenvy::dotenv();

    init_logging();

    let config = AppConfig::from_env()?;
    tracing::info!(model = ?config.model, rates = ?config.rates, "Configuration loaded");

    let llm = Arc::new(LoggingService::new(Arc::new(OpenAIService::new(
        &config.model,
    )?)));
    let rates = Arc::new(ExchangeRateClient::new(&config.rates)?);
    let pipeline = Pipeline::new(Dispatcher::new(llm, config.model.sampling), rates);

    let stdout = std::io::stdout();
    let color = stdout.is_tty();
    let mut renderer = Renderer::new(stdout, color);
    session::run_session(&pipeline, BufReader::new(tokio::io::stdin()), &mut renderer).await?;

    Ok(())
}

/// Logs go to stderr so they never mix with rendered answers.
/// `FX_LOG_FORMAT=json` switches to structured JSON lines.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fx_assistant=warn".into());
    let json = std::env::var("FX_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
