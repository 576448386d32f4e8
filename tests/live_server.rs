//! Runs the relay on a real socket and drives it with the HTTP client.

use emotibot_relay::api::{serve_on, AppState};
use emotibot_relay::client::{ClientError, MoodClient, MoodStream, StreamMessage};
use emotibot_relay::store::{MoodBackend, MoodStore, StoreConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;

async fn next_mood(stream: &mut MoodStream) -> String {
    loop {
        let message = timeout(Duration::from_secs(3), stream.next_message())
            .await
            .expect("timed out waiting for stream message")
            .expect("stream closed")
            .expect("stream error");
        match message {
            StreamMessage::Mood(mood) => return mood.value,
            StreamMessage::KeepAlive => continue,
            StreamMessage::ServerError(e) => panic!("server error event: {}", e),
        }
    }
}

#[tokio::test]
async fn test_streaming_api() {
    let store = Arc::new(MoodStore::new(StoreConfig::default()).unwrap());
    let backend: Arc<dyn MoodBackend> = store.clone();
    let state = AppState::with_heartbeat(backend, Duration::from_secs(1));
    let shutdown = state.shutdown.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_on(listener, state));

    let client = MoodClient::new(format!("http://{}", addr)).unwrap();

    let mut stream = client.stream().await.unwrap();
    assert_eq!(next_mood(&mut stream).await, "neutral");

    let updated = client.set_mood("happy").await.unwrap();
    assert_eq!(updated.value, "happy");
    client.set_mood("sad").await.unwrap();

    assert_eq!(next_mood(&mut stream).await, "happy");
    assert_eq!(next_mood(&mut stream).await, "sad");

    let current = client.get_mood().await.unwrap();
    assert_eq!(current.value, "sad");

    let rejected = client.set_mood("   ").await;
    assert!(matches!(rejected, Err(ClientError::Status(400))));
    assert_eq!(client.get_mood().await.unwrap().value, "sad");

    // Shutting down ends open streams, so graceful shutdown completes
    shutdown.cancel();
    timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not shut down")
        .unwrap()
        .unwrap();

    let end = timeout(Duration::from_secs(3), async {
        while let Some(message) = stream.next_message().await {
            if message.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(end.is_ok());
    assert_eq!(store.subscriber_count(), 0);
}
