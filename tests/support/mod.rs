// Shared primitives for one-time relay bootstrapping across integration tests.
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use platform_brawl::domain::GameConfig;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Host:port of the relay, published once the server thread has bound its listener.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the relay is running and return its WebSocket URL.
pub fn ensure_server() -> String {
    SERVER_READY.get_or_init(|| {
        let published = Arc::new(OnceLock::<String>::new());
        let published_thread = Arc::clone(&published);
        // An OS thread keeps the server alive across individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_thread.set(addr.to_string());
                platform_brawl::run(listener, GameConfig::default())
                    .await
                    .expect("server failed");
            });
        });
        wait_for_readiness(published);
    });

    let addr = SERVER_ADDR.get().expect("server addr should be initialized");
    format!("ws://{addr}/ws")
}

fn wait_for_readiness(published: Arc<OnceLock<String>>) {
    let addr = loop {
        if let Some(addr) = published.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_ADDR.set(addr.clone());

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect(url: &str) -> Client {
    let (ws, _) = connect_async(url).await.expect("connect to relay");
    ws
}

// Next text frame as JSON, skipping control frames; fails the test after a short wait.
pub async fn next_json(client: &mut Client) -> Value {
    let deadline = Duration::from_secs(2);
    loop {
        let frame = tokio::time::timeout(deadline, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("relay sends JSON");
        }
    }
}

// Skips messages until one of the given type arrives.
pub async fn next_of_type(client: &mut Client, kind: &str) -> Value {
    loop {
        let message = next_json(client).await;
        if message["type"] == kind {
            return message;
        }
    }
}

// Skips messages until one of the given type concerning `id` arrives.
pub async fn next_for(client: &mut Client, kind: &str, field: &str, id: &str) -> Value {
    loop {
        let message = next_of_type(client, kind).await;
        if message[field] == id {
            return message;
        }
    }
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .expect("send to relay");
}
