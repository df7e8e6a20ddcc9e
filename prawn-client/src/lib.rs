//! Prawn Client - live order/table state engine
//!
//! Reconciles a one-shot snapshot with the server's push event stream into
//! one canonical in-memory store, derives aggregate views from it, and
//! runs the time-boxed customer session with its persisted cart.

pub mod board;
pub mod cart;
pub mod channel;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;

pub use board::LiveBoard;
pub use cart::{CartEngine, CheckoutError};
pub use channel::{ChannelClient, ChannelError};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::storage::{JsonFileStore, MemoryStore, SessionStore, StorageError};
pub use session::{
    Activation, EvictionNotice, RedirectReason, SESSION_TTL, SessionManager, SessionManagerError,
};
pub use store::{AggregatedItem, ApplyOutcome, OrderStore};

// Re-export shared types for convenience
pub use shared::channel::{ChannelEvent, Flow, StoreEvent};
