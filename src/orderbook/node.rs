//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers that thread
//! it into its price level. Pointers are slab keys, not references.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list sorted by id:
//! - `next`: the order with the next higher id
//! - `prev`: the order with the next lower id

use crate::types::Order;

/// Order node stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The actual order data
    pub order: Order,

    /// Next order in the level (higher id), None at the tail
    pub next: Option<usize>,

    /// Previous order in the level (lower id), None at the head
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new order node (not yet linked)
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::orderbook::OrderNode;
    /// use limit_book::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::new(1, Side::Bid, 10_000_000_000, 1));
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (alone in its level, or in none)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.order.size
    }

    /// Replace the size, returning the previous one
    #[inline]
    pub fn set_size(&mut self, size: u64) -> u64 {
        std::mem::replace(&mut self.order.size, size)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
