use std::str::FromStr;

use tracing::info;

use crate::models::homework::{Homework, HomeworkStatus, Verdict};

/// Turn a homework record into the message announcing its current status.
pub fn parse_status(homework: &Homework) -> Result<Verdict, VerdictError> {
    let homework_name = homework
        .homework_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(VerdictError::MissingField("homework_name"))?;

    let raw_status = homework
        .status
        .as_deref()
        .ok_or(VerdictError::MissingField("status"))?;

    let status = HomeworkStatus::from_str(raw_status)
        .map_err(|_| VerdictError::UnknownStatus(raw_status.to_string()))?;

    let message = format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        status.verdict()
    );

    info!(homework = %homework_name, status = %status, "Status message prepared");

    Ok(Verdict {
        status,
        homework_name: homework_name.to_string(),
        message,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerdictError {
    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Homework record is missing field `{0}`")]
    MissingField(&'static str),
}
