//! The poll loop driven against mock Practicum and Telegram servers

mod fixtures;
mod helpers;

use std::time::Duration;

use fixtures::*;
use helpers::*;
use homework_status_bot::models::homework::HomeworkStatus;
use homework_status_bot::services::notifier::Notifier;
use homework_status_bot::services::poller::{PollLoop, PollOutcome, PollSettings};
use homework_status_bot::services::practicum::PracticumClient;
use homework_status_bot::services::telegram::TelegramClient;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn poll_loop(
    practicum_url: String,
    telegram: &MockServer,
) -> PollLoop<PracticumClient, TelegramClient> {
    let source =
        PracticumClient::new(practicum_url, PRACTICUM_TOKEN, TIMEOUT).expect("practicum client");
    let messenger = TelegramClient::new(telegram.uri(), TELEGRAM_TOKEN, CHAT_ID, TIMEOUT)
        .expect("telegram client");

    PollLoop::new(
        source,
        Notifier::new(messenger),
        PollSettings {
            from_date: FROM_DATE,
            retry_period: Duration::from_secs(600),
        },
    )
}

async fn respond_once(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_same_status_twice_sends_one_message() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(homeworks_with_status("reviewing")))
        .expect(2)
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);
    assert_eq!(
        poller.poll_once().await,
        PollOutcome::StatusChanged(HomeworkStatus::Reviewing)
    );
    assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);

    assert_eq!(
        sent_messages(&telegram).await,
        vec![
            "Изменился статус проверки работы \"username__hw_python_oop.zip\". \
             Работа взята на проверку ревьюером."
        ]
    );
}

#[tokio::test]
async fn test_review_finished_sends_second_message() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;
    respond_once(&practicum, homeworks_with_status("reviewing")).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(homeworks_with_status("approved")))
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);
    poller.poll_once().await;
    poller.poll_once().await;

    let messages = sent_messages(&telegram).await;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].ends_with("Работа взята на проверку ревьюером."));
    assert!(messages[1].ends_with("Работа проверена: ревьюеру всё понравилось. Ура!"));
}

#[tokio::test]
async fn test_unknown_status_reported_once() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(homeworks_with_status("archived")))
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);
    for _ in 0..3 {
        poller.poll_once().await;
    }

    assert_eq!(
        sent_messages(&telegram).await,
        vec!["Сбой в работе программы: Unknown homework status: archived"]
    );
}

#[tokio::test]
async fn test_unreachable_api_reported_once() {
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;

    let mut poller = poll_loop(closed_port_url(), &telegram);
    assert_eq!(poller.poll_once().await, PollOutcome::Failed { notified: true });
    assert_eq!(poller.poll_once().await, PollOutcome::Failed { notified: false });

    let messages = sent_messages(&telegram).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Сбой в работе программы: Practicum API is unreachable"));
}

#[tokio::test]
async fn test_homeworks_as_string_is_reported() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"homeworks": "hw1"})))
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);
    poller.poll_once().await;

    assert_eq!(
        sent_messages(&telegram).await,
        vec!["Сбой в работе программы: API response is missing list `homeworks`"]
    );
}

#[tokio::test]
async fn test_empty_window_stays_silent() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_telegram_ok(&telegram).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_homeworks()))
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);

    assert_eq!(poller.poll_once().await, PollOutcome::NoHomeworks);
    assert!(sent_messages(&telegram).await.is_empty());
}

#[tokio::test]
async fn test_telegram_outage_does_not_stop_polling() {
    let practicum = MockServer::start().await;
    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&telegram)
        .await;
    respond_once(&practicum, homeworks_with_status("reviewing")).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(homeworks_with_status("rejected")))
        .mount(&practicum)
        .await;

    let mut poller = poll_loop(statuses_url(&practicum), &telegram);

    assert_eq!(
        poller.poll_once().await,
        PollOutcome::StatusChanged(HomeworkStatus::Reviewing)
    );
    assert_eq!(
        poller.poll_once().await,
        PollOutcome::StatusChanged(HomeworkStatus::Rejected)
    );
    assert_eq!(poller.state().last_status, Some(HomeworkStatus::Rejected));
}
