//! Cross-order item totals
//!
//! Derived view, recomputed in full from the store on every mutation.
//! O(orders × lines) per call, fine at tens of concurrent orders.

use std::collections::HashMap;

use serde::Serialize;
use shared::models::Order;

/// Summed quantity of one item name across all live orders
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AggregatedItem {
    pub name: String,
    pub quantity: i64,
}

/// Scan orders in their current order and sum line quantities per item
/// name (exact, case-sensitive). Output is ordered by each name's first
/// occurrence during the scan.
pub fn aggregate_items(orders: &[Order]) -> Vec<AggregatedItem> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<AggregatedItem> = Vec::new();

    for order in orders {
        for line in &order.lines {
            match index.get(line.name.as_str()) {
                Some(&i) => totals[i].quantity += i64::from(line.quantity),
                None => {
                    index.insert(line.name.as_str(), totals.len());
                    totals.push(AggregatedItem {
                        name: line.name.clone(),
                        quantity: i64::from(line.quantity),
                    });
                }
            }
        }
    }

    totals
}
