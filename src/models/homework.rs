use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Review state of a homework as reported by the Practicum API.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, EnumString, AsRefStr, Display, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict sent to the student.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// One entry of the `homeworks` list.
///
/// `status` and `homework_name` stay optional here; their absence is reported
/// when the record is turned into a [`Verdict`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homework {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homework_name: Option<String>,

    /// Everything else the API returned for this record.
    #[serde(flatten)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

/// Notification text derived from a homework record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: HomeworkStatus,
    pub homework_name: String,
    pub message: String,
}
