//! Mock servers standing in for the Practicum and Telegram APIs

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::{CHAT_ID, TELEGRAM_TOKEN};

pub const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";
pub const TIMEOUT: Duration = Duration::from_secs(2);

pub fn statuses_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), STATUSES_PATH)
}

/// Answer every `sendMessage` call with `{"ok": true}`.
pub async fn mount_telegram_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TELEGRAM_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1, "chat": {"id": CHAT_ID}}
        })))
        .mount(server)
        .await;
}

/// Texts of all messages the Telegram mock has received, in order.
pub async fn sent_messages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter_map(|body| body["text"].as_str().map(str::to_string))
        .collect()
}

/// A local address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}{}", addr, STATUSES_PATH)
}
