use std::process::ExitCode;

use chrono::Utc;
use homework_status_bot::{
    config::{AppConfig, LogFormat},
    services::{
        notifier::Notifier, poller::PollLoop, practicum::PracticumClient,
        telegram::TelegramClient,
    },
    telemetry,
};

type Poller = PollLoop<PracticumClient, TelegramClient>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_logging(LogFormat::default());
            tracing::error!(severity = "critical", error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Initialize structured logging
    telemetry::init_logging(config.log_format);

    tracing::info!("Starting homework status bot v{}", env!("CARGO_PKG_VERSION"));

    let mut poller = match build_poller(&config) {
        Ok(poller) => poller,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Startup failed, exiting");
            return ExitCode::FAILURE;
        }
    };

    poller.run().await;
    ExitCode::SUCCESS
}

/// Check credentials and wire the loop to its collaborators.
fn build_poller(config: &AppConfig) -> Result<Poller, Box<dyn std::error::Error>> {
    let credentials = config.credentials()?;

    telemetry::describe_metrics();
    if let Some(addr) = config.metrics_addr.as_deref() {
        let addr = telemetry::install_exporter(addr)?;
        tracing::info!(%addr, "Prometheus exporter listening");
    }

    tracing::info!(endpoint = %config.practicum_endpoint, "Initializing Practicum API client");
    let source = PracticumClient::new(
        config.practicum_endpoint.as_str(),
        credentials.practicum_token,
        config.request_timeout(),
    )?;

    tracing::info!("Initializing Telegram client");
    let messenger = TelegramClient::new(
        config.telegram_api_url.as_str(),
        credentials.telegram_token,
        credentials.telegram_chat_id,
        config.request_timeout(),
    )?;
    tracing::debug!(chat_id = messenger.chat_id(), "Notifications will go to chat");

    let settings = config.poll_settings(Utc::now().timestamp());

    Ok(PollLoop::new(source, Notifier::new(messenger), settings))
}
