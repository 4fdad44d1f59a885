use futures::{SinkExt, StreamExt};
use herald_core::HubConfig;
use herald_web::{create_router, state::AppState};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_app() -> (String, AppState) {
    start_app_with(HubConfig::default()).await
}

async fn start_app_with(config: HubConfig) -> (String, AppState) {
    let state = AppState::new(config);
    let app = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{}", addr), state)
}

async fn create(base: &str, title: &str) -> Value {
    let resp = reqwest::Client::new()
        .post(format!("{}/notifications", base))
        .json(&json!({"title": title, "body": "body"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.unwrap()
}

async fn connect(base: &str, path: &str) -> Client {
    let url = format!("{}{}", base.replacen("http", "ws", 1), path);
    let (client, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    client
}

async fn next_notification(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("no frame within timeout")
            .expect("socket closed")
            .unwrap();
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn wait_for_connections(state: &AppState, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while state.hub.connection_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection count never settled");
}

#[tokio::test]
async fn backlog_then_live_push() {
    let (base, state) = start_app().await;
    let first = create(&base, "first").await;
    let second = create(&base, "second").await;

    let mut client = connect(&base, "/live").await;
    assert_eq!(next_notification(&mut client).await, first);
    assert_eq!(next_notification(&mut client).await, second);

    wait_for_connections(&state, 1).await;
    let third = create(&base, "third").await;
    assert_eq!(next_notification(&mut client).await, third);
}

#[tokio::test]
async fn client_frames_do_not_replay_history() {
    let (base, state) = start_app().await;
    create(&base, "only").await;

    let mut client = connect(&base, "/ws").await;
    assert_eq!(next_notification(&mut client).await["title"], "only");

    client.send(WsMessage::text("ping")).await.unwrap();
    let quiet = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(quiet.is_err(), "server answered a client frame");

    wait_for_connections(&state, 1).await;
}

#[tokio::test]
async fn closing_the_socket_unregisters() {
    let (base, state) = start_app().await;
    let mut a = connect(&base, "/live").await;
    let mut b = connect(&base, "/live").await;
    wait_for_connections(&state, 2).await;

    a.close(None).await.unwrap();
    wait_for_connections(&state, 1).await;

    let created = create(&base, "after close").await;
    assert_eq!(next_notification(&mut b).await, created);
}

#[tokio::test]
async fn stalled_client_is_dropped_without_slowing_others() {
    let (base, state) = start_app_with(HubConfig {
        queue_capacity: 4,
        write_timeout_ms: 200,
    })
    .await;

    // Never read from this one.
    let _stalled = connect(&base, "/live").await;
    let mut fast = connect(&base, "/live").await;
    wait_for_connections(&state, 2).await;

    let reader = tokio::spawn(async move {
        let mut titles = Vec::new();
        for _ in 0..200 {
            let notification = next_notification(&mut fast).await;
            titles.push(notification["title"].as_str().unwrap().to_string());
        }
        titles
    });

    let started = Instant::now();
    let http = reqwest::Client::new();
    let body = "x".repeat(64 * 1024);
    for i in 0..200 {
        let resp = http
            .post(format!("{}/notifications", base))
            .json(&json!({"title": format!("n{}", i), "body": body}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    }

    let titles = tokio::time::timeout(Duration::from_secs(20), reader)
        .await
        .expect("fast client fell behind")
        .unwrap();
    let expected: Vec<String> = (0..200).map(|i| format!("n{}", i)).collect();
    assert_eq!(titles, expected);
    assert!(started.elapsed() < Duration::from_secs(20));

    wait_for_connections(&state, 1).await;
}
