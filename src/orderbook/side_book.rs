//! One side of the book: price levels ordered best-first.
//!
//! ## Price Ordering
//!
//! The side is a `BTreeMap` whose key type fixes the iteration direction:
//!
//! - **Bids**: `Reverse<u64>` keys, so the highest price comes first
//! - **Offers**: plain `u64` keys, so the lowest price comes first
//!
//! The key type is the only difference between the two sides. Levels exist
//! only while they hold an order, so level rank 1 is always the best price
//! and ranks are contiguous.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use slab::Slab;
use tracing::trace;

use crate::error::{BookError, Result};
use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{Order, Side};

/// Level key for a side book: orders prices best-first.
pub trait LevelKey: Ord + Copy {
    /// Side whose ordering this key encodes
    const SIDE: Side;

    fn from_price(price: u64) -> Self;

    fn price(self) -> u64;
}

/// Ascending prices: best offer is the lowest
impl LevelKey for u64 {
    const SIDE: Side = Side::Offer;

    #[inline]
    fn from_price(price: u64) -> Self {
        price
    }

    #[inline]
    fn price(self) -> u64 {
        self
    }
}

/// Descending prices: best bid is the highest
impl LevelKey for Reverse<u64> {
    const SIDE: Side = Side::Bid;

    #[inline]
    fn from_price(price: u64) -> Self {
        Reverse(price)
    }

    #[inline]
    fn price(self) -> u64 {
        self.0
    }
}

/// Price levels for a single side.
#[derive(Debug, Clone)]
pub struct SideBook<K> {
    levels: BTreeMap<K, PriceLevel>,
    order_count: usize,
}

/// Bid side, highest price first
pub type BidBook = SideBook<Reverse<u64>>;

/// Offer side, lowest price first
pub type OfferBook = SideBook<u64>;

impl<K: LevelKey> Default for SideBook<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: LevelKey> SideBook<K> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        K::SIDE
    }

    /// Number of orders on this side
    #[inline]
    pub fn len(&self) -> usize {
        self.order_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Number of non-empty price levels
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Link an order already stored in the slab into its price level,
    /// creating the level on first use.
    pub fn insert(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let price = slab[key].price();
        let level = self.levels.entry(K::from_price(price)).or_insert_with(|| {
            trace!(side = ?K::SIDE, price, "price level created");
            PriceLevel::new(price)
        });
        level.insert(key, slab);
        self.order_count += 1;
    }

    /// Unlink an order from its price level, pruning the level if it empties.
    ///
    /// # Returns
    ///
    /// The size of the removed order, or `None` if its level does not exist
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> Option<u64> {
        let price = slab[key].price();
        let level_key = K::from_price(price);
        let level = self.levels.get_mut(&level_key)?;

        let size = level.remove(key, slab);
        self.order_count -= 1;

        if level.is_empty() {
            self.levels.remove(&level_key);
            trace!(side = ?K::SIDE, price, "price level pruned");
        }
        Some(size)
    }

    /// Apply an in-place size change to the level's cached total
    pub fn resize(&mut self, price: u64, old_size: u64, new_size: u64) {
        if let Some(level) = self.levels.get_mut(&K::from_price(price)) {
            level.resize(old_size, new_size);
        }
    }

    /// Drop every level
    pub fn clear(&mut self) {
        self.levels.clear();
        self.order_count = 0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Level by 1-indexed rank, 1 = best price
    ///
    /// Rank 0 and ranks past the deepest level both return `None`.
    pub fn level(&self, rank: usize) -> Option<&PriceLevel> {
        let index = rank.checked_sub(1)?;
        self.levels.values().nth(index)
    }

    /// Best price level
    #[inline]
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// Level at an exact price
    pub fn level_at(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&K::from_price(price))
    }

    /// Levels best-to-worst
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels.values()
    }

    /// Orders best-to-worst price, then ascending id within each level
    pub fn orders<'a>(&'a self, slab: &'a Slab<OrderNode>) -> impl Iterator<Item = &'a Order> + 'a {
        self.levels.values().flat_map(move |level| level.iter(slab))
    }

    /// Check every level and the side-wide order count
    pub fn verify(&self, slab: &Slab<OrderNode>) -> Result<usize> {
        let mut count = 0;
        for (key, level) in &self.levels {
            if key.price() != level.price {
                return Err(BookError::Integrity(format!(
                    "level keyed at {} holds price {}",
                    key.price(),
                    level.price
                )));
            }
            level.verify(K::SIDE, slab)?;
            count += level.order_count;
        }
        if count != self.order_count {
            return Err(BookError::Integrity(format!(
                "{:?} side counts {} orders but levels hold {}",
                K::SIDE,
                self.order_count,
                count
            )));
        }
        Ok(count)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn add(slab: &mut Slab<OrderNode>, side: Side, id: u64, price: u64, size: u64) -> usize {
        slab.insert(OrderNode::new(Order::new(id, side, price, size)))
    }

    fn prices<K: LevelKey>(book: &SideBook<K>) -> Vec<u64> {
        book.levels().map(|l| l.price).collect()
    }

    #[test]
    fn test_bid_levels_descending() {
        let mut slab = Slab::new();
        let mut bids = BidBook::new();

        for (id, price) in [(1, 100), (2, 300), (3, 200)] {
            let key = add(&mut slab, Side::Bid, id, price, 1);
            bids.insert(key, &mut slab);
        }

        assert_eq!(bids.side(), Side::Bid);
        assert_eq!(prices(&bids), vec![300, 200, 100]);
        assert_eq!(bids.best().map(|l| l.price), Some(300));
        bids.verify(&slab).unwrap();
    }

    #[test]
    fn test_offer_levels_ascending() {
        let mut slab = Slab::new();
        let mut offers = OfferBook::new();

        for (id, price) in [(1, 100), (2, 300), (3, 200)] {
            let key = add(&mut slab, Side::Offer, id, price, 1);
            offers.insert(key, &mut slab);
        }

        assert_eq!(offers.side(), Side::Offer);
        assert_eq!(prices(&offers), vec![100, 200, 300]);
        assert_eq!(offers.best().map(|l| l.price), Some(100));
    }

    #[test]
    fn test_level_rank() {
        let mut slab = Slab::new();
        let mut bids = BidBook::new();

        for (id, price) in [(1, 100), (2, 200)] {
            let key = add(&mut slab, Side::Bid, id, price, 1);
            bids.insert(key, &mut slab);
        }

        assert!(bids.level(0).is_none());
        assert_eq!(bids.level(1).map(|l| l.price), Some(200));
        assert_eq!(bids.level(2).map(|l| l.price), Some(100));
        assert!(bids.level(3).is_none());
    }

    #[test]
    fn test_remove_prunes_empty_level() {
        let mut slab = Slab::new();
        let mut offers = OfferBook::new();

        let k1 = add(&mut slab, Side::Offer, 1, 100, 5);
        let k2 = add(&mut slab, Side::Offer, 2, 200, 7);
        offers.insert(k1, &mut slab);
        offers.insert(k2, &mut slab);
        assert_eq!(offers.depth(), 2);

        assert_eq!(offers.remove(k1, &mut slab), Some(5));
        assert_eq!(offers.depth(), 1);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers.level(1).map(|l| l.price), Some(200));
        assert!(offers.level_at(100).is_none());
        offers.verify(&slab).unwrap();
    }

    #[test]
    fn test_orders_flattened_in_priority() {
        let mut slab = Slab::new();
        let mut bids = BidBook::new();

        for (id, price) in [(3, 100), (1, 100), (2, 110), (4, 90)] {
            let key = add(&mut slab, Side::Bid, id, price, 1);
            bids.insert(key, &mut slab);
        }

        let ids: Vec<u64> = bids.orders(&slab).map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut slab = Slab::new();
        let mut bids = BidBook::new();

        let key = add(&mut slab, Side::Bid, 1, 100, 10);
        bids.insert(key, &mut slab);

        let old = slab[key].set_size(40);
        bids.resize(100, old, 40);
        assert_eq!(bids.best().map(|l| l.total_size()), Some(40));

        bids.clear();
        assert!(bids.is_empty());
        assert_eq!(bids.depth(), 0);
    }
}
