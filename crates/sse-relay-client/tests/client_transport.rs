mod support;

use serde_json::json;
use sse_relay_client::{RelayClient, RelayError, StreamEvent};
use tokio::sync::mpsc;
use tokio::time::timeout;

use support::mock_relay::{MockRelay, STEP_TIMEOUT, SseBody};

#[tokio::test]
async fn post_message_returns_echo() {
    let relay = MockRelay::start().await;
    relay.accept_messages().await;
    let client = RelayClient::new(&relay.config()).unwrap();

    let accepted = client.post_message("ping me").await.unwrap();
    assert_eq!(accepted.status.as_deref(), Some("accepted"));
    assert_eq!(accepted.message(), "ping me");
}

#[tokio::test]
async fn publish_is_queued() {
    let relay = MockRelay::start().await;
    relay.accept_publish().await;
    let client = RelayClient::new(&relay.config()).unwrap();

    let queued = client.publish("direct").await.unwrap();
    assert_eq!(queued.status.as_deref(), Some("queued"));
    assert_eq!(queued.message(), "direct");
}

#[tokio::test]
async fn ping_reports_pong() {
    let relay = MockRelay::start().await;
    relay.serve_ping().await;
    let client = RelayClient::new(&relay.config()).unwrap();

    let pong = client.ping().await.unwrap();
    assert!(pong.is_ok());
    assert_eq!(pong.message.as_deref(), Some("pong"));
}

#[tokio::test]
async fn malformed_success_body_is_a_request_error() {
    let relay = MockRelay::start().await;
    relay.reject_messages(200, json!({"unexpected": true})).await;
    let client = RelayClient::new(&relay.config()).unwrap();

    let err = client.post_message("x").await.unwrap_err();
    assert!(matches!(err, RelayError::Request { status: Some(200), .. }));
    assert!(err.to_string().starts_with("Malformed response"));
}

#[tokio::test]
async fn unreachable_relay_is_a_request_error() {
    let client =
        RelayClient::new(&sse_relay_client::RelayConfig::new("http://127.0.0.1:9")).unwrap();
    let err = client.post_message("x").await.unwrap_err();
    assert!(err.is_request_error());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn open_stream_forwards_tagged_frames() {
    let relay = MockRelay::start().await;
    relay
        .serve_stream(
            SseBody::new()
                .keepalive()
                .event("progress", json!({"step": 1}))
                .burst("hi", 1),
        )
        .await;
    let client = RelayClient::new(&relay.config()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _connection = client.open_stream(42, tx);

    let mut names = Vec::new();
    loop {
        let update = timeout(STEP_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for stream update")
            .expect("update channel closed");
        assert_eq!(update.connection_id, 42);
        names.push(update.event.name().to_string());
        if matches!(update.event, StreamEvent::Error { .. }) {
            break;
        }
    }

    assert_eq!(
        names,
        vec!["open", "keepalive", "progress", "message", "close", "error"]
    );
}

#[tokio::test]
async fn closed_stream_stops_forwarding() {
    let relay = MockRelay::start().await;
    relay.serve_stream(SseBody::new().burst("hi", 2)).await;
    let client = RelayClient::new(&relay.config()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut connection = client.open_stream(1, tx);
    connection.close();
    drop(connection);

    // The reader is aborted; the channel closes once its sender is dropped.
    let next = timeout(STEP_TIMEOUT, rx.recv()).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn non_event_stream_response_is_an_error() {
    let relay = MockRelay::start().await;
    relay
        .serve_stream_as("event: message\ndata: {}\n\n", "text/plain")
        .await;
    let client = RelayClient::new(&relay.config()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _connection = client.open_stream(5, tx);

    let update = timeout(STEP_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for stream update")
        .expect("update channel closed");
    assert_eq!(update.connection_id, 5);
    match update.event {
        StreamEvent::Error { reason } => assert!(reason.contains("text/plain"), "{reason}"),
        other => panic!("expected an error, got {other:?}"),
    }
}
