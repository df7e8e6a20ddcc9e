//! Live board: one store fed by a snapshot and the event stream
//!
//! Mount order: load the snapshot first, then attach the channel. The
//! listener task is the only writer while attached; reads and writes go
//! through the same lock, so mutations are serialized. A locally issued
//! mutation call racing an inbound event for the same entity has no
//! defined order: whichever applies later wins.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channel::ChannelClient;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::store::{AggregatedItem, OrderStore};
use shared::channel::Flow;
use shared::models::{DiningTable, Order, TableStatus};

struct ListenerTask {
    cancel: CancellationToken,
    _handle: JoinHandle<()>,
}

/// One mounted staff view (counter orders or table orders)
pub struct LiveBoard {
    flow: Flow,
    store: Arc<Mutex<OrderStore>>,
    listener: Option<ListenerTask>,
}

impl LiveBoard {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            store: Arc::new(Mutex::new(OrderStore::new())),
            listener: None,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Fetch the full collection and replace the store with it.
    ///
    /// On failure the store keeps its prior contents (possibly empty) and
    /// the error is returned; no retry is attempted here.
    pub async fn load_snapshot(&self, http: &HttpClient) -> ClientResult<usize> {
        let orders = match self.flow {
            Flow::Counter => http.fetch_orders().await?,
            Flow::Table => http.fetch_table_orders().await?,
        };
        let count = orders.len();
        self.store.lock().unwrap().replace(orders);
        tracing::info!(count, flow = ?self.flow, "Snapshot loaded");
        Ok(count)
    }

    /// Start applying channel events to the store.
    ///
    /// Any previous listener is cancelled first, so at most one task
    /// mutates the store. Events for the other flow are filtered out
    /// before they reach it.
    pub fn attach(&mut self, channel: &ChannelClient) {
        self.detach();

        let mut rx = channel.subscribe();
        let store = Arc::clone(&self.store);
        let flow = self.flow;
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => break,
                    event = rx.recv() => event,
                };

                match event {
                    Ok(event) => {
                        if let Some(store_event) = event.for_flow(flow) {
                            let outcome = store.lock().unwrap().apply(store_event);
                            tracing::debug!(?outcome, "Applied channel event");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // A fresh snapshot is the recovery path after loss
                        tracing::warn!(missed, "Board listener lagged, events were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        self.listener = Some(ListenerTask {
            cancel,
            _handle: handle,
        });
    }

    /// Stop the listener. Idempotent; also runs on drop.
    pub fn detach(&mut self) {
        if let Some(task) = self.listener.take() {
            task.cancel.cancel();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Current collection, newest first
    pub fn orders(&self) -> Vec<Order> {
        self.store.lock().unwrap().orders().to_vec()
    }

    /// Aggregates as of the last mutation
    pub fn aggregates(&self) -> Vec<AggregatedItem> {
        self.store.lock().unwrap().aggregates().to_vec()
    }

    /// Derived status of one table against the live collection
    pub fn table_status(&self, table: &DiningTable) -> TableStatus {
        self.store.lock().unwrap().table_status(table)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }
}

impl Drop for LiveBoard {
    fn drop(&mut self) {
        self.detach();
    }
}
