//! Logging and metrics setup, done once at process start.

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

pub const DEFAULT_FILTER: &str = "homework_status_bot=debug,info";

/// `RUST_LOG` if set, otherwise [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Build a subscriber that writes to `writer`.
pub fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    match format {
        LogFormat::Json => Box::new(builder.json().finish()),
        LogFormat::Pretty => Box::new(builder.with_target(false).finish()),
    }
}

/// Install the process-wide subscriber writing to stdout.
pub fn init_logging(format: LogFormat) {
    let subscriber = subscriber(format, env_filter(), std::io::stdout);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("logging already initialised: {e}");
    }
}

pub fn describe_metrics() {
    metrics::describe_counter!("homework_polls_total", "Poll iterations started");
    metrics::describe_counter!(
        "homework_poll_failures_total",
        "Poll iterations that failed, by kind"
    );
    metrics::describe_counter!(
        "homework_status_changes_total",
        "Homework status transitions detected"
    );
    metrics::describe_counter!("notifications_sent_total", "Telegram messages delivered");
    metrics::describe_counter!(
        "notifications_failed_total",
        "Telegram messages that could not be delivered"
    );
}

/// Serve Prometheus metrics on `addr`. Must be called inside the tokio runtime.
pub fn install_exporter(addr: &str) -> Result<SocketAddr, TelemetryError> {
    let addr: SocketAddr = addr.parse()?;
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    Ok(addr)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid metrics listener address: {0}")]
    Addr(#[from] AddrParseError),

    #[error("Failed to install Prometheus exporter: {0}")]
    Exporter(#[from] BuildError),
}
