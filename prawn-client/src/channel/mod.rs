//! Event channel client
//!
//! Consumes the server's push stream: reads text frames from a transport,
//! decodes them into [`ChannelEvent`]s and fans them out on a broadcast
//! bus. Malformed frames are logged and dropped; they never reach the
//! store. Frames are delivered to subscribers strictly in arrival order.

pub mod transport;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use shared::channel::ChannelEvent;

use self::transport::{FrameTransport, MemoryTransport, TcpTransport};

/// Event channel error type
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Failed to establish the connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport-level IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer ended the stream
    #[error("Channel closed")]
    Closed,

    /// Frame was not a valid event document
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

/// Push stream client
///
/// The decode loop runs until the transport ends or [`shutdown`] is
/// called; dropping the client also stops it.
///
/// [`shutdown`]: ChannelClient::shutdown
#[derive(Debug)]
pub struct ChannelClient {
    event_tx: broadcast::Sender<ChannelEvent>,
    cancel: CancellationToken,
}

impl ChannelClient {
    /// Connect to the event channel over TCP
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let transport = TcpTransport::connect(addr).await?;
        Ok(Self::new(transport))
    }

    /// Create an in-process client over a broadcast frame feed
    pub fn memory(feed: &broadcast::Sender<String>) -> Self {
        Self::new(MemoryTransport::new(feed))
    }

    fn new<T: FrameTransport + 'static>(transport: T) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let cancel = CancellationToken::new();

        let tx = event_tx.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    _ = token.cancelled() => break,
                    frame = transport.read_frame() => frame,
                };

                match frame {
                    Ok(frame) => {
                        if frame.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ChannelEvent>(&frame) {
                            Ok(event) => {
                                if let Err(e) = tx.send(event) {
                                    tracing::debug!("No subscribers for event: {}", e);
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Dropping malformed channel frame");
                            }
                        }
                    }
                    Err(ChannelError::Closed) => {
                        tracing::info!("Event channel closed by peer");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Event channel read failed");
                        break;
                    }
                }
            }
            let _ = transport.close().await;
        });

        Self { event_tx, cancel }
    }

    /// Subscribe to decoded events.
    ///
    /// Each subscriber receives every event decoded after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the decode loop
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
