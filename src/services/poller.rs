//! The polling loop: fetch, validate, detect status changes, notify.
//!
//! Failures never stop the loop. Each distinct failure text is notified once;
//! identical consecutive failures are only logged.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::models::homework::HomeworkStatus;
use crate::services::notifier::{Messenger, Notifier};
use crate::services::practicum::{ApiError, HomeworkSource};
use crate::services::validation::{self, SchemaError};
use crate::services::verdict::{self, VerdictError};

const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Timing parameters of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Lower bound (unix seconds) sent with every request.
    pub from_date: i64,
    /// Pause after each iteration, successful or not.
    pub retry_period: Duration,
}

/// State carried between iterations for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopState {
    pub cursor: i64,
    pub last_status: Option<HomeworkStatus>,
    pub last_error: Option<String>,
}

impl LoopState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    fn is_current(&self, raw_status: Option<&str>) -> bool {
        match (self.last_status, raw_status) {
            (Some(last), Some(raw)) => last.as_ref() == raw,
            _ => false,
        }
    }
}

/// Result of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    StatusChanged(HomeworkStatus),
    Unchanged,
    NoHomeworks,
    Failed { notified: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Verdict(#[from] VerdictError),
}

impl PollError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Api(ApiError::EndpointUnreachable(_)) => "endpoint_unreachable",
            Self::Api(ApiError::UnexpectedStatus(_)) => "unexpected_status",
            Self::Api(ApiError::MalformedResponse(_)) => "malformed_response",
            Self::Schema(_) => "schema",
            Self::Verdict(VerdictError::UnknownStatus(_)) => "unknown_status",
            Self::Verdict(VerdictError::MissingField(_)) => "missing_field",
        }
    }

    /// Text sent to the chat when this failure is first seen.
    pub fn report(&self) -> String {
        format!("{}: {}", FAILURE_PREFIX, self)
    }
}

pub struct PollLoop<S, M> {
    source: S,
    notifier: Notifier<M>,
    retry_period: Duration,
    state: LoopState,
}

impl<S: HomeworkSource, M: Messenger> PollLoop<S, M> {
    pub fn new(source: S, notifier: Notifier<M>, settings: PollSettings) -> Self {
        Self {
            source,
            notifier,
            retry_period: settings.retry_period,
            state: LoopState::new(settings.from_date),
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }

    /// Poll forever, sleeping `retry_period` after every iteration.
    pub async fn run(&mut self) {
        info!(
            from_date = self.state.cursor,
            retry_period_secs = self.retry_period.as_secs(),
            "Starting homework status polling"
        );

        loop {
            let outcome = self.poll_once().await;
            debug!(?outcome, "Poll iteration finished");
            sleep(self.retry_period).await;
        }
    }

    /// Run one iteration without sleeping.
    pub async fn poll_once(&mut self) -> PollOutcome {
        metrics::counter!("homework_polls_total").increment(1);

        match self.check_status().await {
            Ok(outcome) => outcome,
            Err(e) => self.report_failure(e).await,
        }
    }

    async fn check_status(&mut self) -> Result<PollOutcome, PollError> {
        let response = self.source.fetch(self.state.cursor).await?;
        let homeworks = validation::check_response(&response)?;

        let Some(homework) = validation::first_homework(homeworks)? else {
            debug!("No homeworks in the requested window");
            return Ok(PollOutcome::NoHomeworks);
        };

        if self.state.is_current(homework.status.as_deref()) {
            debug!(status = ?homework.status, "Homework status unchanged");
            return Ok(PollOutcome::Unchanged);
        }

        let verdict = verdict::parse_status(&homework)?;
        self.state.last_status = Some(verdict.status);
        metrics::counter!("homework_status_changes_total").increment(1);

        info!(
            homework = %verdict.homework_name,
            status = %verdict.status,
            "Homework status changed"
        );
        self.notifier.notify(&verdict.message).await;

        Ok(PollOutcome::StatusChanged(verdict.status))
    }

    async fn report_failure(&mut self, e: PollError) -> PollOutcome {
        let kind = e.kind();
        let message = e.report();
        metrics::counter!("homework_poll_failures_total", "kind" => kind).increment(1);
        error!(kind, error = %e, "{}", message);

        if self.state.last_error.as_deref() == Some(message.as_str()) {
            debug!(kind, "Repeated failure, notification suppressed");
            return PollOutcome::Failed { notified: false };
        }

        self.notifier.notify(&message).await;
        self.state.last_error = Some(message);

        PollOutcome::Failed { notified: true }
    }
}
