//! Canned Practicum API payloads

use serde_json::{json, Value};

pub const PRACTICUM_TOKEN: &str = "y0_practicum_test_token";
pub const TELEGRAM_TOKEN: &str = "123456:telegram-test-token";
pub const CHAT_ID: &str = "100500";
pub const FROM_DATE: i64 = 1_700_000_000;

/// A response whose newest homework has the given status.
pub fn homeworks_with_status(status: &str) -> Value {
    json!({
        "homeworks": [
            {
                "id": 124,
                "status": status,
                "homework_name": "username__hw_python_oop.zip",
                "reviewer_comment": "",
                "date_updated": "2020-02-13T14:40:57Z",
                "lesson_name": "Итоговый проект"
            },
            {
                "id": 123,
                "status": "approved",
                "homework_name": "username__hw_test.zip",
                "reviewer_comment": "Всё нравится",
                "date_updated": "2020-02-11T14:40:57Z",
                "lesson_name": "Тестовый проект"
            }
        ],
        "current_date": FROM_DATE
    })
}

pub fn empty_homeworks() -> Value {
    json!({"homeworks": [], "current_date": FROM_DATE})
}
