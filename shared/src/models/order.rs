//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
///
/// Transitions are monotonic: `Pending` → `Completed`, never back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl OrderStatus {
    /// Whether `next` is a legal transition from `self`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        !(self == OrderStatus::Completed && next == OrderStatus::Pending)
    }
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Menu item reference
    pub item_id: i64,
    pub name: String,
    /// Unit price in cents
    pub price_cents: i64,
    /// Positive; a line whose quantity drops to zero is removed, not kept
    pub quantity: i32,
}

/// Live order entity
///
/// `customer_name` carries the party identifier on the counter flow,
/// `table_name` on the table flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Server-assigned unique ID
    pub id: i64,
    pub customer_name: Option<String>,
    pub table_name: Option<String>,
    pub phone: Option<String>,
    /// Payment method tag (e.g. "CASH", "CARD", "UPI")
    pub payment_method: String,
    /// Total amount in cents; equals Σ price × quantity at last confirmed save
    pub total_cents: i64,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    /// Epoch millis
    pub created_at: i64,
}

impl Order {
    /// The party identifier: customer name on the counter flow, table name
    /// on the table flow.
    pub fn party(&self) -> Option<&str> {
        self.customer_name.as_deref().or(self.table_name.as_deref())
    }

    /// Recomputed sum over lines, in cents. `total_cents` may transiently
    /// diverge from this between saves; the stored total wins.
    pub fn lines_total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.price_cents.saturating_mul(i64::from(l.quantity)))
            .sum()
    }

    /// Shallow-merge `patch` into this order.
    ///
    /// Status reversals (Completed → Pending) are ignored. Replacement
    /// lines are normalized: quantity ≤ 0 removes the line.
    pub fn apply_patch(&mut self, patch: OrderPatch) {
        if let Some(customer_name) = patch.customer_name {
            self.customer_name = Some(customer_name);
        }
        if let Some(table_name) = patch.table_name {
            self.table_name = Some(table_name);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(payment_method) = patch.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(total_cents) = patch.total_cents {
            self.total_cents = total_cents;
        }
        if let Some(status) = patch.status {
            if self.status.can_transition_to(status) {
                self.status = status;
            } else {
                tracing::debug!(order_id = self.id, "Ignoring status reversal in patch");
            }
        }
        if let Some(mut lines) = patch.lines {
            lines.retain(|l| l.quantity > 0);
            self.lines = lines;
        }
    }
}

/// Partial update payload
///
/// `None` means "leave the field unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<OrderLine>>,
}

/// Create order payload (the server assigns the ID)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: Option<String>,
    pub table_name: Option<String>,
    pub phone: Option<String>,
    pub payment_method: String,
    pub total_cents: i64,
    pub lines: Vec<OrderLine>,
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdateStatus {
    pub status: OrderStatus,
}
