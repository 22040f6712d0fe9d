//! Deferred delivery of replies to a callback URL.

use crate::command::PendingResponse;
use crate::error::DeliveryError;
use crate::types::SlashResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument};

/// Outbound channel for deferred replies.
///
/// Implementations are shared across all in-flight deliveries and must be
/// safe for concurrent use.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Post `response` to `response_url`. Called at most once per reply.
    async fn deliver(&self, response_url: &str, response: &SlashResponse)
        -> Result<(), DeliveryError>;
}

/// Schedules pending replies on the tokio runtime and pushes them to their
/// callback URL when they resolve.
#[derive(Clone)]
pub struct DeferredDelivery {
    sink: Arc<dyn ResponseSink>,
}

impl DeferredDelivery {
    /// Create a new delivery service posting through `sink`.
    pub fn new(sink: Arc<dyn ResponseSink>) -> Self {
        Self { sink }
    }

    /// Return `ack` immediately and deliver `pending` in the background.
    ///
    /// A failed computation is delivered as a user-only error reply. A failed
    /// push is logged and dropped; there is no retry.
    ///
    /// The continuation is handed to `tokio::spawn` before `ack` is returned.
    /// On a multi-threaded runtime another worker may start polling it right
    /// away; when it runs relative to the ack is up to the runtime.
    pub fn reply_later(
        &self,
        pending: PendingResponse,
        ack: SlashResponse,
        response_url: String,
    ) -> SlashResponse {
        let sink = self.sink.clone();
        let span = info_span!("deferred_reply", %response_url);

        tokio::spawn(
            async move {
                let response = match pending.await {
                    Ok(response) => response,
                    Err(e) => {
                        debug!("Deferred command failed: {}", e);
                        SlashResponse::from_failure(&e)
                    }
                };

                match sink.deliver(&response_url, &response).await {
                    Ok(()) => debug!("Deferred reply delivered"),
                    Err(e) => error!("Failed to deliver deferred reply: {}", e),
                }
            }
            .instrument(span),
        );

        ack
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Visibility;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::{mpsc, oneshot};

    /// Sink that forwards every delivery to a channel.
    pub(crate) struct RecordingSink {
        tx: mpsc::UnboundedSender<(String, SlashResponse)>,
        fail: bool,
    }

    impl RecordingSink {
        pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, SlashResponse)>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { tx, fail: false }), rx)
        }

        fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, SlashResponse)>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { tx, fail: true }), rx)
        }
    }

    #[async_trait]
    impl ResponseSink for RecordingSink {
        async fn deliver(
            &self,
            response_url: &str,
            response: &SlashResponse,
        ) -> Result<(), DeliveryError> {
            let _ = self.tx.send((response_url.to_string(), response.clone()));
            if self.fail {
                Err(DeliveryError::Rejected {
                    status: 500,
                    body: "boom".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    async fn next_delivery(
        rx: &mut mpsc::UnboundedReceiver<(String, SlashResponse)>,
    ) -> (String, SlashResponse) {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("delivery timed out")
            .expect("sink dropped")
    }

    #[tokio::test]
    async fn test_ack_returned_before_pending_resolves() {
        let (sink, mut rx) = RecordingSink::new();
        let delivery = DeferredDelivery::new(sink);
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let pending: PendingResponse = Box::pin(async move {
            release_rx.await?;
            Ok::<_, anyhow::Error>(SlashResponse::channel("Release 1.2.0 created"))
        });

        let ack = delivery.reply_later(
            pending,
            SlashResponse::user("Working on it"),
            "https://hooks.example.com/1".into(),
        );
        assert_eq!(ack, SlashResponse::user("Working on it"));

        // Nothing is delivered while the computation is still pending.
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        release_tx.send(()).unwrap();
        let (url, response) = next_delivery(&mut rx).await;
        assert_eq!(url, "https://hooks.example.com/1");
        assert_eq!(response, SlashResponse::channel("Release 1.2.0 created"));

        // Exactly one delivery.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_continuation_not_started_before_ack() {
        let (sink, mut rx) = RecordingSink::new();
        let delivery = DeferredDelivery::new(sink);
        let started = Arc::new(AtomicBool::new(false));

        let flag = started.clone();
        let pending: PendingResponse = Box::pin(async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(SlashResponse::channel("Done"))
        });

        let ack = delivery.reply_later(
            pending,
            SlashResponse::user("Queued"),
            "https://hooks.example.com/4".into(),
        );

        // Current-thread runtime: the spawned task only runs once we yield.
        assert!(!started.load(Ordering::SeqCst));
        assert_eq!(ack.text, "Queued");

        next_delivery(&mut rx).await;
        assert!(started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failed_computation_delivers_user_error() {
        let (sink, mut rx) = RecordingSink::new();
        let delivery = DeferredDelivery::new(sink);

        let pending: PendingResponse =
            Box::pin(async { Err::<SlashResponse, _>(anyhow::anyhow!("GitHub returned 502")) });
        delivery.reply_later(
            pending,
            SlashResponse::user("Working on it"),
            "https://hooks.example.com/2".into(),
        );

        let (_, response) = next_delivery(&mut rx).await;
        assert_eq!(response.visibility, Visibility::User);
        assert_eq!(response.text, "GitHub returned 502");
    }

    #[tokio::test]
    async fn test_delivery_failure_is_not_retried() {
        let (sink, mut rx) = RecordingSink::failing();
        let delivery = DeferredDelivery::new(sink);

        let pending: PendingResponse =
            Box::pin(async { Ok::<_, anyhow::Error>(SlashResponse::channel("Done")) });
        let ack = delivery.reply_later(
            pending,
            SlashResponse::user("Queued"),
            "https://hooks.example.com/3".into(),
        );
        assert_eq!(ack.text, "Queued");

        next_delivery(&mut rx).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
