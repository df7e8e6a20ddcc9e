//! Canonical in-memory order collection
//!
//! One store per mounted view. A snapshot read replaces the whole
//! collection; push events are reconciled into it one at a time, in
//! arrival order, with no reordering and no timestamp conflict
//! resolution (last-applied-wins). Aggregates are recomputed after every
//! successful mutation.

pub mod aggregate;

pub use self::aggregate::AggregatedItem;

use shared::channel::StoreEvent;
use shared::models::{DiningTable, Order, TableStatus};

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// New entry inserted at the front
    Inserted,
    /// Patch merged into an existing entry
    Updated,
    /// Entry removed
    Removed,
    /// Duplicate create, stale update, or delete of an absent id
    Ignored,
}

/// In-memory canonical collection of orders, newest first
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
    aggregates: Vec<AggregatedItem>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire collection with a fresh snapshot, not a merge.
    ///
    /// Safe to call repeatedly (e.g. after a reconnect); the snapshot is
    /// idempotent with respect to the server's current truth.
    pub fn replace(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.recompute();
    }

    /// Reconcile one event into the collection.
    ///
    /// - `Created`: duplicate ids are a no-op (dedupes the race between a
    ///   snapshot fetch and the created-event for the same entity);
    ///   otherwise insert at the front.
    /// - `Updated`: shallow-merge; an unmatched id is a stale event and is
    ///   silently discarded.
    /// - `Deleted`: absence is not an error.
    pub fn apply(&mut self, event: StoreEvent) -> ApplyOutcome {
        let outcome = match event {
            StoreEvent::Created(order) => {
                if self.orders.iter().any(|o| o.id == order.id) {
                    tracing::debug!(order_id = order.id, "Duplicate create, ignoring");
                    ApplyOutcome::Ignored
                } else {
                    self.orders.insert(0, order);
                    ApplyOutcome::Inserted
                }
            }
            StoreEvent::Updated { id, patch } => {
                match self.orders.iter_mut().find(|o| o.id == id) {
                    Some(order) => {
                        order.apply_patch(patch);
                        ApplyOutcome::Updated
                    }
                    None => {
                        tracing::debug!(order_id = id, "Stale update for absent order, discarding");
                        ApplyOutcome::Ignored
                    }
                }
            }
            StoreEvent::Deleted { id } => {
                let before = self.orders.len();
                self.orders.retain(|o| o.id != id);
                if self.orders.len() < before {
                    ApplyOutcome::Removed
                } else {
                    ApplyOutcome::Ignored
                }
            }
        };

        if outcome != ApplyOutcome::Ignored {
            self.recompute();
        }
        outcome
    }

    /// Current collection, newest first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Aggregates as of the last mutation
    pub fn aggregates(&self) -> &[AggregatedItem] {
        &self.aggregates
    }

    pub fn get(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Derive a table's status from the live collection.
    pub fn table_status(&self, table: &DiningTable) -> TableStatus {
        table.status(&self.orders)
    }

    fn recompute(&mut self) {
        self.aggregates = aggregate::aggregate_items(&self.orders);
    }
}
