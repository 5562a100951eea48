//! Shape checks for Practicum API responses.

use serde_json::Value;
use tracing::{debug, error};

use crate::models::homework::Homework;

const HOMEWORKS_KEY: &str = "homeworks";

/// Check that the response is an object carrying a `homeworks` array and
/// return that array.
pub fn check_response(response: &Value) -> Result<&[Value], SchemaError> {
    debug!(response = %response, "Validating API response");

    let Some(object) = response.as_object() else {
        error!("API response is not a JSON object");
        return Err(SchemaError::NotAMapping);
    };

    match object.get(HOMEWORKS_KEY).and_then(Value::as_array) {
        Some(homeworks) => Ok(homeworks.as_slice()),
        None => {
            error!(key = HOMEWORKS_KEY, "API response has no homework list");
            Err(SchemaError::MissingList)
        }
    }
}

/// Decode the most recent homework, or `None` when the list is empty.
pub fn first_homework(homeworks: &[Value]) -> Result<Option<Homework>, SchemaError> {
    let Some(first) = homeworks.first() else {
        return Ok(None);
    };

    if !first.is_object() {
        return Err(SchemaError::InvalidRecord("record is not a mapping".into()));
    }

    serde_json::from_value(first.clone())
        .map(Some)
        .map_err(|e| SchemaError::InvalidRecord(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("API response is not a mapping")]
    NotAMapping,

    #[error("API response is missing list `homeworks`")]
    MissingList,

    #[error("Homework record is invalid: {0}")]
    InvalidRecord(String),
}
