//! Limit order book with price/time priority.
//!
//! ## Architecture
//!
//! - **Slab**: Pre-allocated storage for every resting order
//! - **SideBook**: Price-ordered levels for bids and for offers
//! - **HashMap**: Order ID to slab key mapping for O(1) lookup on cancel/modify
//!
//! Every mutating call updates the index and the side books together before
//! it returns, so an order is reachable from the index exactly when it is
//! reachable by walking its side.
//!
//! ## Contract Violations
//!
//! - Adding an id that is already resting fails with
//!   [`BookError::DuplicateOrderId`] and leaves the book untouched.
//! - Level queries take 1-indexed levels; level 0 fails with
//!   [`BookError::InvalidLevel`]. Levels past the deepest one are `None`/`0`.
//!
//! Unknown ids on remove/modify are silent no-ops.
//!
//! ## Example
//!
//! ```
//! use limit_book::orderbook::OrderBook;
//! use limit_book::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(1_000);
//!
//! book.add_order(Order::from_f64(1, Side::Bid, 100.0, 10).unwrap()).unwrap();
//! book.add_order(Order::from_f64(2, Side::Bid, 200.0, 20).unwrap()).unwrap();
//! book.add_order(Order::from_f64(3, Side::Bid, 200.0, 30).unwrap()).unwrap();
//!
//! assert_eq!(book.price_for_level(Side::Bid, 1).unwrap(), Some(20_000_000_000));
//! assert_eq!(book.size_for_level(Side::Bid, 1).unwrap(), 50);
//! assert_eq!(book.size_for_level(Side::Bid, 2).unwrap(), 10);
//! assert_eq!(book.size_for_level(Side::Bid, 3).unwrap(), 0);
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::{debug, warn};

use crate::error::{BookError, Result};
use crate::orderbook::side_book::{BidBook, OfferBook};
use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{Order, Side};

/// Limit order book
///
/// Single-threaded and synchronous. Callers sharing a book across threads
/// must wrap the whole book in one lock (or drive it from one task).
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    /// Order storage
    /// Key: slab index, Value: OrderNode
    orders: Slab<OrderNode>,

    /// Bid price levels (highest first)
    bids: BidBook,

    /// Offer price levels (lowest first)
    offers: OfferBook,

    /// Order ID to slab key mapping
    order_index: HashMap<u64, usize>,
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with pre-allocated capacity
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::orderbook::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BidBook::new(),
            offers: OfferBook::new(),
            order_index: HashMap::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Get the current capacity (pre-allocated slots)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Get the total number of orders in the book
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.depth()
    }

    /// Get the number of offer price levels
    #[inline]
    pub fn offer_levels(&self) -> usize {
        self.offers.depth()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add an order to the book
    ///
    /// The order joins the level for its side and price, behind every
    /// resting order at that price with a lower id and ahead of every one
    /// with a higher id.
    ///
    /// # Errors
    ///
    /// * `BookError::DuplicateOrderId` if an order with the same id is resting
    /// * `BookError::InvalidSideCode` if `side_raw` is not a known side
    ///
    /// The book is left unchanged on error.
    pub fn add_order(&mut self, order: Order) -> Result<()> {
        if self.order_index.contains_key(&order.id) {
            warn!(order_id = order.id, "rejected order with duplicate id");
            return Err(BookError::DuplicateOrderId(order.id));
        }
        let Some(side) = Side::from_u8(order.side_raw) else {
            warn!(order_id = order.id, side_raw = order.side_raw, "rejected order with unknown side");
            return Err(BookError::InvalidSideCode(order.side_raw));
        };

        let order_id = order.id;
        debug!(order_id, ?side, price = order.price, size = order.size, "adding order");

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(order_id, key);

        match side {
            Side::Bid => self.bids.insert(key, &mut self.orders),
            Side::Offer => self.offers.insert(key, &mut self.orders),
        }
        Ok(())
    }

    /// Remove an order by id
    ///
    /// Removing the last order at a price removes the level, so the levels
    /// behind it move up one rank.
    ///
    /// # Returns
    ///
    /// The removed order, or `None` (and no change) if the id is not resting
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::orderbook::OrderBook;
    /// use limit_book::types::{Order, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.add_order(Order::new(42, Side::Bid, 10_000_000_000, 1)).unwrap();
    ///
    /// assert_eq!(book.remove_order(42).map(|o| o.id), Some(42));
    /// assert!(book.remove_order(42).is_none());
    /// assert_eq!(book.price_for_level(Side::Bid, 1).unwrap(), None);
    /// ```
    pub fn remove_order(&mut self, order_id: u64) -> Option<Order> {
        let key = self.order_index.remove(&order_id)?;
        let side = self.orders[key].order.side();

        let unlinked = match side {
            Side::Bid => self.bids.remove(key, &mut self.orders),
            Side::Offer => self.offers.remove(key, &mut self.orders),
        };
        if unlinked.is_none() {
            warn!(order_id, ?side, "indexed order had no price level");
        }

        let order = self.orders.remove(key).order;
        debug!(order_id, ?side, price = order.price, "removed order");
        Some(order)
    }

    /// Change the size of a resting order in place
    ///
    /// Time priority is untouched: the order keeps its position in its level.
    ///
    /// # Returns
    ///
    /// The previous size, or `None` (and no change) if the id is not resting
    pub fn modify_order_size(&mut self, order_id: u64, new_size: u64) -> Option<u64> {
        let key = *self.order_index.get(&order_id)?;
        let node = &mut self.orders[key];
        let old_size = node.set_size(new_size);
        let price = node.price();

        match node.order.side() {
            Side::Bid => self.bids.resize(price, old_size, new_size),
            Side::Offer => self.offers.resize(price, old_size, new_size),
        }

        debug!(order_id, old_size, new_size, "modified order size");
        Some(old_size)
    }

    /// Get a resting order by id
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let key = *self.order_index.get(&order_id)?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Check if an order is resting
    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Clear all orders from the book
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.offers.clear();
        self.order_index.clear();
    }

    // ========================================================================
    // Level Queries
    // ========================================================================

    fn level(&self, side: Side, level: usize) -> Result<Option<&PriceLevel>> {
        if level == 0 {
            warn!(?side, "level query with level 0");
            return Err(BookError::InvalidLevel(level));
        }
        Ok(match side {
            Side::Bid => self.bids.level(level),
            Side::Offer => self.offers.level(level),
        })
    }

    /// Price of the `level`-th best price level on `side` (1 = best)
    ///
    /// # Returns
    ///
    /// * `Ok(Some(price))` - fixed-point price of that level
    /// * `Ok(None)` - the side has fewer than `level` levels
    ///
    /// # Errors
    ///
    /// `BookError::InvalidLevel` for level 0.
    pub fn price_for_level(&self, side: Side, level: usize) -> Result<Option<u64>> {
        Ok(self.level(side, level)?.map(|l| l.price))
    }

    /// Total size resting at the `level`-th best price level on `side`
    ///
    /// Returns 0 if the side has fewer than `level` levels.
    ///
    /// # Errors
    ///
    /// `BookError::InvalidLevel` for level 0.
    pub fn size_for_level(&self, side: Side, level: usize) -> Result<u64> {
        Ok(self.level(side, level)?.map_or(0, |l| l.total_size()))
    }

    /// Best bid price (highest)
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best().map(|l| l.price)
    }

    /// Best offer price (lowest)
    #[inline]
    pub fn best_offer(&self) -> Option<u64> {
        self.offers.best().map(|l| l.price)
    }

    /// Up to `levels` `(price, total size)` pairs for `side`, best first
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(u64, u64)> {
        match side {
            Side::Bid => self.bids.levels().take(levels).map(|l| (l.price, l.total_size())).collect(),
            Side::Offer => self.offers.levels().take(levels).map(|l| (l.price, l.total_size())).collect(),
        }
    }

    // ========================================================================
    // Order Listings
    // ========================================================================

    /// All orders on `side`, best price first, then ascending id
    pub fn orders_for_side(&self, side: Side) -> Vec<&Order> {
        match side {
            Side::Bid => self.bids.orders(&self.orders).collect(),
            Side::Offer => self.offers.orders(&self.orders).collect(),
        }
    }

    /// Every resting order, in no particular order
    pub fn all_orders(&self) -> Vec<&Order> {
        self.orders.iter().map(|(_, node)| &node.order).collect()
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every resting order
    ///
    /// Orders are hashed in listing order: bids then offers, each best price
    /// first and ascending id within a level. Two books holding the same
    /// orders at the same priorities produce the same root.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        for order in self.bids.orders(&self.orders).chain(self.offers.orders(&self.orders)) {
            let bytes = ssz_rs::serialize(order)
                .map_err(|e| BookError::Encoding(format!("order {}: {:?}", order.id, e)))?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> Result<String> {
        Ok(hex::encode(self.state_root()?))
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Check that the id index, the slab, and both side books agree
    ///
    /// Every indexed id must point at a stored order with that id, every
    /// stored order must be linked into exactly one level of its side, and
    /// every level must be non-empty, id-ordered, and carry correct totals.
    pub fn verify_integrity(&self) -> Result<()> {
        for (&order_id, &key) in &self.order_index {
            match self.orders.get(key) {
                Some(node) if node.order_id() == order_id => {}
                _ => {
                    return Err(BookError::Integrity(format!(
                        "index entry {} -> {} does not match storage",
                        order_id, key
                    )))
                }
            }
        }

        let linked = self.bids.verify(&self.orders)? + self.offers.verify(&self.orders)?;
        if linked != self.orders.len() || self.order_index.len() != self.orders.len() {
            return Err(BookError::Integrity(format!(
                "{} stored, {} indexed, {} linked",
                self.orders.len(),
                self.order_index.len(),
                linked
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
