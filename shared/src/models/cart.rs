//! Cart Model
//!
//! Quantity-indexed item selection bound to one customer session.
//! Pure collection semantics live here; persistence and checkout live in
//! the client engine.

use serde::{Deserialize, Serialize};

use super::order::OrderLine;

/// One selected item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Menu item reference
    pub item_id: i64,
    pub name: String,
    /// Unit price in cents
    pub price_cents: i64,
    /// Always ≥ 1; decrementing below 1 removes the item
    pub quantity: u32,
}

/// Ordered-by-first-insertion collection keyed by item id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Quantity for an item id, zero when absent.
    pub fn quantity(&self, item_id: i64) -> u32 {
        self.items
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Add one unit: bump the quantity when the id is already present,
    /// append with quantity 1 otherwise.
    pub fn add(&mut self, item_id: i64, name: &str, price_cents: i64) {
        match self.items.iter_mut().find(|i| i.item_id == item_id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                item_id,
                name: name.to_string(),
                price_cents,
                quantity: 1,
            }),
        }
    }

    /// Bump the quantity of a present item. Returns false when absent.
    pub fn increment(&mut self, item_id: i64) -> bool {
        match self.items.iter_mut().find(|i| i.item_id == item_id) {
            Some(item) => {
                item.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Drop the quantity of a present item; at quantity 1 the item is
    /// removed entirely (quantity 0 is never stored). Returns false when
    /// absent.
    pub fn decrement(&mut self, item_id: i64) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.item_id == item_id) else {
            return false;
        };
        if self.items[pos].quantity <= 1 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity -= 1;
        }
        true
    }

    /// Unconditional delete; absence is not an error.
    pub fn remove(&mut self, item_id: i64) {
        self.items.retain(|i| i.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Σ price × quantity, in cents.
    pub fn total_cents(&self) -> i64 {
        self.items
            .iter()
            .map(|i| crate::money::line_total_cents(i.price_cents, i.quantity))
            .sum()
    }

    /// Convert to order lines for submission.
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine {
                item_id: i.item_id,
                name: i.name.clone(),
                price_cents: i.price_cents,
                quantity: i.quantity as i32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_by_id() {
        let mut cart = Cart::new();
        cart.add(1, "Idli", 5000);
        cart.add(1, "Idli", 5000);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity(1), 2);
        assert_eq!(cart.total_cents(), 10000);
    }

    #[test]
    fn test_decrement_removes_at_one() {
        let mut cart = Cart::new();
        cart.add(1, "Idli", 5000);
        cart.increment(1);
        assert!(cart.decrement(1));
        assert_eq!(cart.quantity(1), 1);
        // second decrement removes the item rather than storing quantity 0
        assert!(cart.decrement(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_ops_on_absent_id() {
        let mut cart = Cart::new();
        assert!(!cart.increment(9));
        assert!(!cart.decrement(9));
        cart.remove(9); // no-op
        assert!(cart.is_empty());
    }

    #[test]
    fn test_first_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add(2, "Vada", 3000);
        cart.add(1, "Idli", 5000);
        cart.add(2, "Vada", 3000);
        let ids: Vec<i64> = cart.items().iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_to_order_lines() {
        let mut cart = Cart::new();
        cart.add(1, "Idli", 5000);
        cart.increment(1);
        let lines = cart.to_order_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].price_cents, 5000);
    }
}
