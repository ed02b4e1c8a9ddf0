//! Limit Book - demo binary
//!
//! Builds a small book, exercises every operation, and logs the result.
//! Set `RUST_LOG=limit_book=debug` to see per-order events.

use limit_book::types::price::from_fixed_trimmed;
use limit_book::{Order, OrderBook, Result, Side};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn log_side(book: &OrderBook, side: Side) {
    for (rank, (price, size)) in book.depth(side, usize::MAX).into_iter().enumerate() {
        info!(
            ?side,
            level = rank + 1,
            price = %from_fixed_trimmed(price),
            size,
            "level"
        );
    }
    for order in book.orders_for_side(side) {
        info!(%order, "resting");
    }
}

fn run() -> Result<()> {
    let mut book = OrderBook::with_capacity(64);

    let orders = [
        (1, 'B', 100.0, 5),
        (2, 'B', 110.0, 3),
        (3, 'B', 90.0, 2),
        (5, 'O', 100.0, 4),
        (4, 'O', 100.0, 2),
        (6, 'O', 120.0, 1),
    ];
    for (id, tag, price, size) in orders {
        book.add_order(Order::from_f64(id, Side::try_from(tag)?, price, size)?)?;
    }

    log_side(&book, Side::Bid);
    log_side(&book, Side::Offer);

    if let Err(e) = book.add_order(Order::from_f64(1, Side::Offer, 130.0, 9)?) {
        info!(%e, "duplicate rejected");
    }

    book.modify_order_size(1, 25);
    book.remove_order(2);
    book.remove_order(99);

    let best_bid = book.price_for_level(Side::Bid, 1)?.map(from_fixed_trimmed);
    let bid_size = book.size_for_level(Side::Bid, 1)?;
    let best_offer = book.price_for_level(Side::Offer, 1)?.map(from_fixed_trimmed);
    let offer_size = book.size_for_level(Side::Offer, 1)?;
    info!(?best_bid, bid_size, "best bid");
    info!(?best_offer, offer_size, "best offer");

    book.verify_integrity()?;
    let state_root = book.state_root_hex()?;
    info!(
        orders = book.order_count(),
        bid_levels = book.bid_levels(),
        offer_levels = book.offer_levels(),
        %state_root,
        "book state"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!(%e, "demo failed");
        std::process::exit(1);
    }
}
