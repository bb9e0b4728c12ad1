//! The bus subscriber that feeds notice events to the dispatcher.
//!
//! The host owns a broadcast channel of notice events; the composition
//! root builds a dispatcher, wraps it in a `NoticeSubscriber` with a
//! receiver, and spawns `run` at startup.

use crate::dispatcher::NotificationDispatcher;
use crate::serverchan::ServerChanApi;
use crate::types::NoticeEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Receives notice events from the bus and hands them to the dispatcher.
pub struct NoticeSubscriber<C: ServerChanApi> {
    dispatcher: NotificationDispatcher<C>,
    notice_rx: broadcast::Receiver<NoticeEvent>,
}

impl<C: ServerChanApi + 'static> NoticeSubscriber<C> {
    /// Creates a new `NoticeSubscriber`.
    pub fn new(
        dispatcher: NotificationDispatcher<C>,
        notice_rx: broadcast::Receiver<NoticeEvent>,
    ) -> Self {
        Self {
            dispatcher,
            notice_rx,
        }
    }

    /// Runs the subscriber's main loop until the bus closes.
    pub async fn run(mut self) {
        info!("NoticeSubscriber started.");
        loop {
            match self.notice_rx.recv().await {
                Ok(event) => {
                    self.dispatcher.handle_notice_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("NoticeSubscriber lagged behind and missed {} events.", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Notice channel closed. NoticeSubscriber shutting down.");
                    break;
                }
            }
        }
    }

    /// Spawns the subscriber onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifierConfig;
    use crate::serverchan::{SendError, SendReply};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::time::Duration;

    struct RecordingClient {
        titles: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn new() -> Self {
            Self {
                titles: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ServerChanApi for RecordingClient {
        async fn send(
            &self,
            title: &str,
            _body: &str,
            _tags: &str,
        ) -> Result<SendReply, SendError> {
            self.titles.lock().unwrap().push(title.to_string());
            Ok(SendReply::default())
        }
    }

    fn active_dispatcher(
        client: Arc<RecordingClient>,
    ) -> NotificationDispatcher<RecordingClient> {
        let config = NotifierConfig {
            enabled: true,
            send_key: "SCT1234".to_string(),
            ..Default::default()
        };
        NotificationDispatcher::new(config, client)
    }

    #[tokio::test]
    async fn test_subscriber_forwards_events_and_stops_on_close() {
        let (notice_tx, notice_rx) = broadcast::channel(16);
        let client = Arc::new(RecordingClient::new());
        let subscriber = NoticeSubscriber::new(active_dispatcher(client.clone()), notice_rx);
        let handle = subscriber.spawn();

        notice_tx
            .send(NoticeEvent {
                title: Some("one".to_string()),
                ..Default::default()
            })
            .unwrap();
        notice_tx
            .send(NoticeEvent {
                title: Some("two".to_string()),
                ..Default::default()
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(notice_tx);

        // The loop must exit cleanly once the channel closes.
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("subscriber did not shut down")
            .unwrap();

        assert_eq!(*client.titles.lock().unwrap(), vec!["one", "two"]);
    }
}
