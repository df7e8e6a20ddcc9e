//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::order::{Order, OrderStatus};

/// Dining table entity (桌台)
///
/// Status is never stored; it is derived from the live order collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    /// Table number, unique key within one restaurant
    pub name: String,
}

/// Derived table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Empty,
    Pending,
    Completed,
}

impl DiningTable {
    /// Derive this table's status from the live orders.
    ///
    /// At most one live order is expected per table name; the first match
    /// in scan order wins.
    pub fn status(&self, orders: &[Order]) -> TableStatus {
        match orders
            .iter()
            .find(|o| o.table_name.as_deref() == Some(self.name.as_str()))
        {
            None => TableStatus::Empty,
            Some(order) => match order.status {
                OrderStatus::Pending => TableStatus::Pending,
                OrderStatus::Completed => TableStatus::Completed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_order(table: &str, status: OrderStatus) -> Order {
        Order {
            id: 7,
            customer_name: None,
            table_name: Some(table.to_string()),
            phone: None,
            payment_method: "CASH".to_string(),
            total_cents: 0,
            status,
            lines: vec![],
            created_at: 0,
        }
    }

    #[test]
    fn test_status_is_derived_not_stored() {
        let t = DiningTable {
            id: 1,
            name: "T1".to_string(),
        };

        assert_eq!(t.status(&[]), TableStatus::Empty);
        assert_eq!(
            t.status(&[table_order("T1", OrderStatus::Pending)]),
            TableStatus::Pending
        );
        assert_eq!(
            t.status(&[table_order("T1", OrderStatus::Completed)]),
            TableStatus::Completed
        );
        // another table's order does not light this one up
        assert_eq!(
            t.status(&[table_order("T2", OrderStatus::Pending)]),
            TableStatus::Empty
        );
    }
}
