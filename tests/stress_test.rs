//! Stress tests for the limit order book.
//!
//! These tests verify:
//! 1. The id index and the side books stay consistent under random load
//! 2. Identical operation streams produce identical state roots
//! 3. Level aggregates always match a brute-force recomputation
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use limit_book::{Order, OrderBook, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Number of operations for the throughput test
const STRESS_OP_COUNT: usize = 200_000;

/// Base price: 100.00000000 in fixed-point
const BASE_PRICE: u64 = 10_000_000_000;

/// Tick: 0.01000000 in fixed-point
const TICK: u64 = 1_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(Order),
    Remove(u64),
    Modify(u64, u64),
}

/// Generate a deterministic operation stream.
///
/// Ids are drawn from a small pool so removals and modifications regularly
/// hit both live and already-removed orders, and adds sometimes collide.
fn generate_ops(count: usize, seed: u64) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let id_pool = (count as u64 / 2).max(8);

    (0..count)
        .map(|_| {
            let id = rng.gen_range(1..=id_pool);
            match rng.gen_range(0..10) {
                0..=5 => {
                    let side = if rng.gen_bool(0.5) { Side::Bid } else { Side::Offer };
                    let price = BASE_PRICE - 50 * TICK + rng.gen_range(0..100) * TICK;
                    Op::Add(Order::new(id, side, price, rng.gen_range(1..=1_000)))
                }
                6..=7 => Op::Remove(id),
                _ => Op::Modify(id, rng.gen_range(0..=1_000)),
            }
        })
        .collect()
}

fn apply(book: &mut OrderBook, op: &Op) {
    match op {
        Op::Add(order) => {
            let _ = book.add_order(order.clone());
        }
        Op::Remove(id) => {
            book.remove_order(*id);
        }
        Op::Modify(id, size) => {
            book.modify_order_size(*id, *size);
        }
    }
}

fn run_sequence(seed: u64, count: usize) -> [u8; 32] {
    let mut book = OrderBook::with_capacity(count);
    for op in generate_ops(count, seed) {
        apply(&mut book, &op);
    }
    book.state_root().expect("state root")
}

/// Recompute level prices and sizes from the flat order list.
fn brute_force_levels(book: &OrderBook, side: Side) -> Vec<(u64, u64)> {
    let mut levels: BTreeMap<u64, u64> = BTreeMap::new();
    for order in book.all_orders().into_iter().filter(|o| o.side() == side) {
        *levels.entry(order.price).or_default() += order.size;
    }
    let mut levels: Vec<(u64, u64)> = levels.into_iter().collect();
    if side == Side::Bid {
        levels.reverse();
    }
    levels
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Random load with an integrity check after every operation.
#[test]
fn stress_integrity_under_random_ops() {
    const OPS: usize = 20_000;

    let mut book = OrderBook::new();
    let mut rejected = 0usize;

    for (i, op) in generate_ops(OPS, 7).iter().enumerate() {
        if let Op::Add(order) = op {
            if book.add_order(order.clone()).is_err() {
                rejected += 1;
                assert!(book.contains_order(order.id));
            }
        } else {
            apply(&mut book, op);
        }

        if i % 97 == 0 {
            book.verify_integrity()
                .unwrap_or_else(|e| panic!("integrity lost after op {}: {}", i, e));
        }
    }

    book.verify_integrity().expect("final integrity");
    assert!(rejected > 0, "the id pool should force some duplicate adds");
    println!("  Final book size: {}, duplicates rejected: {}", book.order_count(), rejected);
}

/// Level queries agree with a brute-force recomputation.
#[test]
fn stress_levels_match_brute_force() {
    let mut book = OrderBook::new();
    for op in generate_ops(5_000, 99) {
        apply(&mut book, &op);
    }

    for side in [Side::Bid, Side::Offer] {
        let expected = brute_force_levels(&book, side);
        assert_eq!(book.depth(side, usize::MAX), expected);

        for (rank, &(price, size)) in expected.iter().enumerate() {
            assert_eq!(book.price_for_level(side, rank + 1), Ok(Some(price)));
            assert_eq!(book.size_for_level(side, rank + 1), Ok(size));
        }
        assert_eq!(book.price_for_level(side, expected.len() + 1), Ok(None));
        assert_eq!(book.size_for_level(side, expected.len() + 1), Ok(0));
    }
}

/// Listings are sorted by price priority, then by id.
#[test]
fn stress_listing_order() {
    let mut book = OrderBook::new();
    for op in generate_ops(5_000, 1234) {
        apply(&mut book, &op);
    }

    let bids = book.orders_for_side(Side::Bid);
    for pair in bids.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.price > b.price || (a.price == b.price && a.id < b.id));
    }

    let offers = book.orders_for_side(Side::Offer);
    for pair in offers.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.price < b.price || (a.price == b.price && a.id < b.id));
    }

    assert_eq!(bids.len() + offers.len(), book.all_orders().len());
}

/// Verify determinism: Same sequence produces identical state root.
#[test]
fn verify_determinism() {
    const TEST_COUNT: usize = 10_000;
    const SEED: u64 = 12345;

    let root1 = run_sequence(SEED, TEST_COUNT);
    let root2 = run_sequence(SEED, TEST_COUNT);

    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for determinism");

    let root3 = run_sequence(SEED + 1, TEST_COUNT);
    assert_ne!(root1, root3, "Different seeds should produce different roots");
}

/// Cancelling everything returns the book to empty.
#[test]
fn stress_drain() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut book = OrderBook::with_capacity(10_000);

    for id in 1..=10_000u64 {
        let side = if rng.gen_bool(0.5) { Side::Bid } else { Side::Offer };
        let price = BASE_PRICE + rng.gen_range(0..500) * TICK;
        book.add_order(Order::new(id, side, price, 1)).expect("unique id");
    }

    let mut ids: Vec<u64> = (1..=10_000).collect();
    while !ids.is_empty() {
        let idx = rng.gen_range(0..ids.len());
        let id = ids.swap_remove(idx);
        assert!(book.remove_order(id).is_some());
    }

    assert!(book.is_empty());
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.offer_levels(), 0);
    book.verify_integrity().expect("empty book is consistent");
}

/// Throughput of a mixed add/remove/modify stream.
#[test]
fn stress_mixed_throughput() {
    let ops = generate_ops(STRESS_OP_COUNT, 42);
    let mut book = OrderBook::with_capacity(STRESS_OP_COUNT);

    let start = Instant::now();
    for op in &ops {
        apply(&mut book, op);
    }
    let elapsed = start.elapsed();
    let throughput = STRESS_OP_COUNT as f64 / elapsed.as_secs_f64();

    println!("  Operations:        {:>12}", STRESS_OP_COUNT);
    println!("  Final book size:   {:>12}", book.order_count());
    println!("  Bid levels:        {:>12}", book.bid_levels());
    println!("  Offer levels:      {:>12}", book.offer_levels());
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  Throughput:        {:>12.0} ops/sec", throughput);

    book.verify_integrity().expect("integrity after load");
}
