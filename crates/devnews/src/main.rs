//! Sends one frontend news digest and exits.

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use devnews::core::Styler;
use devnews::core::styler::{ModelStylerBuilder, UnavailableStyler};
use devnews::feed::HttpFeed;
use devnews::mail::SmtpMailer;
use devnews::{Config, RunOptions, RunOutcome};
use devnews_openai_model::OpenAIProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing `.env` file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    debug!(?config, "loaded configuration");

    let styler: Box<dyn Styler> = match config.openai.clone() {
        Some(openai) => Box::new(
            ModelStylerBuilder::with_model_provider(OpenAIProvider::new(
                openai,
            ))
            .with_timeout(config.styler_timeout)
            .build(),
        ),
        None => {
            warn!("OPENAI_API_KEY is not set, using the local renderer");
            Box::new(UnavailableStyler)
        }
    };
    let feed = HttpFeed::new(config.feed_url.as_str(), config.max_items);
    let mailer = SmtpMailer::new(config.smtp.clone());

    info!("starting frontend news digest");
    let result = devnews::run(
        &feed,
        styler.as_ref(),
        &mailer,
        &RunOptions::from(&config),
    )
    .await;

    match result {
        Ok(RunOutcome::Sent { items, .. }) => {
            info!(items, "newsletter sent");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Skipped) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
