//! Frame transports for the event channel
//!
//! The channel is a read-only push stream of text frames, one JSON
//! document per line. Reconnect and backoff policy belong to the
//! embedding application; a transport only delivers frames until the
//! connection ends.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};

use crate::channel::ChannelError;

/// Transport abstraction for the push stream
#[async_trait]
pub trait FrameTransport: Send + Sync + std::fmt::Debug {
    /// Read the next text frame. Returns [`ChannelError::Closed`] when the
    /// peer goes away.
    async fn read_frame(&self) -> Result<String, ChannelError>;
    async fn close(&self) -> Result<(), ChannelError>;
}

/// TCP transport: newline-delimited JSON frames
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<BufReader<OwnedReadHalf>>>,
    // Held so the connection stays open for the stream's lifetime
    _writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(BufReader::new(reader))),
            _writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl FrameTransport for TcpTransport {
    async fn read_frame(&self) -> Result<String, ChannelError> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        let n = reader.read_line(&mut line).await.map_err(ChannelError::Io)?;
        if n == 0 {
            return Err(ChannelError::Closed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        // Dropping the Arc references closes the stream
        Ok(())
    }
}

/// In-memory transport over a broadcast feed (tests and demos)
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    rx: Arc<Mutex<broadcast::Receiver<String>>>,
}

impl MemoryTransport {
    /// Subscribe to an in-process frame feed.
    pub fn new(feed: &broadcast::Sender<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(feed.subscribe())),
        }
    }
}

#[async_trait]
impl FrameTransport for MemoryTransport {
    async fn read_frame(&self) -> Result<String, ChannelError> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(frame) => return Ok(frame),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Memory feed lagged, frames were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(ChannelError::Closed),
            }
        }
    }

    async fn close(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
