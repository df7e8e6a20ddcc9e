//! Shared types for the Prawn live-order framework
//!
//! Wire-level data models, event channel types, money arithmetic and
//! utility helpers used by the client engine and by test fixtures.

pub mod channel;
pub mod models;
pub mod money;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Channel re-exports (for convenient access)
pub use channel::{ChannelEvent, Flow, StoreEvent};
pub use response::ApiResponse;
