//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` represents all orders at a single price point, kept in a
//! doubly-linked list sorted by ascending order id (time priority).
//!
//! ## Queue Structure
//!
//! ```text
//! head (lowest id) <-> ... <-> tail (highest id)
//! ```
//!
//! - Inserts walk back from the tail to the sorted position
//! - Any order can be removed in O(1) using the slab key
//! - Size changes never relink a node

use slab::Slab;

use crate::error::{BookError, Result};
use crate::orderbook::OrderNode;
use crate::types::{Order, Side};

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the list
/// endpoints and cached aggregates.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of `size` over every order at this level
    ///
    /// Kept wide so the running sum is exact for any mix of u64 sizes.
    total_size: u128,

    /// Lowest-id order (slab key)
    pub head: Option<usize>,

    /// Highest-id order (slab key)
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_size: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Total size resting at this level
    ///
    /// Clamped to `u64::MAX` when the members' sizes sum past it.
    #[inline]
    pub fn total_size(&self) -> u64 {
        u64::try_from(self.total_size).unwrap_or(u64::MAX)
    }

    /// Link an order into the level at its id-sorted position
    ///
    /// Ids normally arrive ascending, so the walk usually stops at the tail.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn insert(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let id = slab[key].order_id();
        let size = slab[key].size();

        let mut after = self.tail;
        while let Some(k) = after {
            if slab[k].order_id() < id {
                break;
            }
            after = slab[k].prev;
        }
        let before = match after {
            Some(k) => slab[k].next,
            None => self.head,
        };

        let node = &mut slab[key];
        node.prev = after;
        node.next = before;

        match after {
            Some(k) => slab[k].next = Some(key),
            None => self.head = Some(key),
        }
        match before {
            Some(k) => slab[k].prev = Some(key),
            None => self.tail = Some(key),
        }

        self.order_count += 1;
        self.total_size += u128::from(size);
    }

    /// Unlink an order from the level by slab key
    ///
    /// # Returns
    ///
    /// The size of the removed order
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let node = &slab[key];
        let size = node.size();
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => slab[prev].next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => slab[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut slab[key];
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_size -= u128::from(size);

        size
    }

    /// Account for an in-place size change of one of this level's orders
    pub fn resize(&mut self, old_size: u64, new_size: u64) {
        self.total_size = self.total_size - u128::from(old_size) + u128::from(new_size);
    }

    /// Iterate the level's orders in time priority (ascending id)
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }

    /// Check the level against its members
    ///
    /// Verifies non-emptiness, strictly ascending ids, matching price and
    /// side, and that the cached count and total equal the member sums.
    pub fn verify(&self, side: Side, slab: &Slab<OrderNode>) -> Result<()> {
        let fail = |msg: String| -> Result<()> {
            Err(BookError::Integrity(format!("level {}: {}", self.price, msg)))
        };

        if self.is_empty() {
            return fail("empty level left in book".to_string());
        }

        let mut count = 0usize;
        let mut total = 0u128;
        let mut last_id: Option<u64> = None;
        let mut prev_key: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            let Some(node) = slab.get(key) else {
                return fail(format!("dangling slab key {}", key));
            };
            if node.prev != prev_key {
                return fail(format!("broken back link at order {}", node.order_id()));
            }
            if node.price() != self.price || node.order.side() != side {
                return fail(format!("order {} is misfiled", node.order_id()));
            }
            if last_id.is_some_and(|last| last >= node.order_id()) {
                return fail(format!("order {} out of time priority", node.order_id()));
            }
            last_id = Some(node.order_id());
            count += 1;
            total += u128::from(node.size());
            prev_key = Some(key);
            cursor = node.next;
        }

        if prev_key != self.tail {
            return fail("tail does not end the list".to_string());
        }
        if count != self.order_count {
            return fail(format!("order_count {} but {} linked", self.order_count, count));
        }
        if total != self.total_size {
            return fail(format!("total_size {} but members sum to {}", self.total_size, total));
        }
        Ok(())
    }
}

/// Iterator over the orders of one level, head to tail.
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slab.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
