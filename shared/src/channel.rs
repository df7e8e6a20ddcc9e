//! Event channel wire types
//!
//! The push connection delivers one JSON document per text frame, tagged
//! with a `type` discriminator. Counter orders and table orders share the
//! order record but travel under distinct discriminators so a board only
//! consumes its own flow.

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderPatch};

/// Which live collection a board is mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Walk-in / counter orders (`*_order` discriminators)
    Counter,
    /// Dine-in table orders (`*_table_order` discriminators)
    Table,
}

/// Decoded push frame
///
/// Discriminators this build does not know fold into [`ChannelEvent::Unknown`]
/// and are treated as no-ops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelEvent {
    NewOrder {
        order: Order,
    },
    UpdateOrder {
        id: i64,
        #[serde(default)]
        fields: OrderPatch,
    },
    DeleteOrder {
        id: i64,
    },
    NewTableOrder {
        order: Order,
    },
    UpdateTableOrder {
        id: i64,
        #[serde(default)]
        fields: OrderPatch,
    },
    DeleteTableOrder {
        id: i64,
    },
    #[serde(other)]
    Unknown,
}

impl ChannelEvent {
    /// Narrow a decoded frame to the store event of one flow.
    ///
    /// Events for the other flow and unknown discriminators yield `None`.
    pub fn for_flow(self, flow: Flow) -> Option<StoreEvent> {
        match (flow, self) {
            (Flow::Counter, ChannelEvent::NewOrder { order }) => Some(StoreEvent::Created(order)),
            (Flow::Counter, ChannelEvent::UpdateOrder { id, fields }) => {
                Some(StoreEvent::Updated { id, patch: fields })
            }
            (Flow::Counter, ChannelEvent::DeleteOrder { id }) => Some(StoreEvent::Deleted { id }),
            (Flow::Table, ChannelEvent::NewTableOrder { order }) => {
                Some(StoreEvent::Created(order))
            }
            (Flow::Table, ChannelEvent::UpdateTableOrder { id, fields }) => {
                Some(StoreEvent::Updated { id, patch: fields })
            }
            (Flow::Table, ChannelEvent::DeleteTableOrder { id }) => {
                Some(StoreEvent::Deleted { id })
            }
            _ => None,
        }
    }

    /// Encode as one text frame (used by fixtures and in-process feeds).
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("Failed to serialize channel event")
    }
}

/// Store-level mutation, flow-agnostic
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Insert at the front unless the id already exists (idempotent)
    Created(Order),
    /// Shallow-merge into the matching entry; discarded when absent
    Updated { id: i64, patch: OrderPatch },
    /// Remove the matching entry; absence is not an error
    Deleted { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn order(id: i64) -> Order {
        Order {
            id,
            customer_name: Some("Asha".to_string()),
            table_name: None,
            phone: None,
            payment_method: "CASH".to_string(),
            total_cents: 100,
            status: OrderStatus::Pending,
            lines: vec![],
            created_at: 0,
        }
    }

    #[test]
    fn test_discriminator_round_trip() {
        let event = ChannelEvent::NewOrder { order: order(1) };
        let frame = event.encode();
        assert!(frame.contains("\"type\":\"new_order\""));

        let decoded: ChannelEvent = serde_json::from_str(&frame).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_unknown_discriminator_decodes_to_unknown() {
        let decoded: ChannelEvent =
            serde_json::from_str(r#"{"type":"menu_changed","id":4}"#).unwrap();
        assert_eq!(decoded, ChannelEvent::Unknown);
        assert_eq!(decoded.for_flow(Flow::Counter), None);
    }

    #[test]
    fn test_update_frame_without_fields() {
        let decoded: ChannelEvent =
            serde_json::from_str(r#"{"type":"update_order","id":4}"#).unwrap();
        match decoded {
            ChannelEvent::UpdateOrder { id, fields } => {
                assert_eq!(id, 4);
                assert_eq!(fields, OrderPatch::default());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_flow_filtering() {
        let table_event: ChannelEvent =
            serde_json::from_str(r#"{"type":"delete_table_order","id":9}"#).unwrap();
        assert_eq!(table_event.clone().for_flow(Flow::Counter), None);
        assert_eq!(
            table_event.for_flow(Flow::Table),
            Some(StoreEvent::Deleted { id: 9 })
        );
    }
}
