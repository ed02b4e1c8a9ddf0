//! Order book module.
//!
//! ## Architecture
//!
//! The book is a price/time priority limit order book with:
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: Orders grouped by price using BTreeMap, best price first
//! - **Time priority**: ascending order id within each price level
//!
//! It never matches: bids and offers are never compared, and orders leave
//! only through an explicit remove.
//!
//! ## Components
//!
//! - [`OrderNode`]: Wrapper around `Order` with linked-list pointers for its price level
//! - [`PriceLevel`]: Orders at a single price point
//! - [`SideBook`]: Price levels for one side
//! - [`OrderBook`]: Main order book with bid/offer sides and the id index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(log L + K) worst, O(log L) for ascending ids |
//! | Remove order by ID | O(log L) |
//! | Modify size by ID | O(log L) |
//! | Price/size at level n | O(n) |
//! | Orders for side | O(N) |
//!
//! L = levels on the side, K = orders at the level, N = orders on the side.
//!
//! ## Example
//!
//! ```
//! use limit_book::orderbook::OrderBook;
//! use limit_book::types::{Order, Side};
//!
//! let mut book = OrderBook::new();
//! book.add_order(Order::new(1, Side::Offer, 10_000_000_000, 5)).unwrap();
//!
//! assert_eq!(book.best_offer(), Some(10_000_000_000));
//! ```

pub mod node;
pub mod level;
pub mod side_book;
pub mod book;

pub use node::OrderNode;
pub use level::{LevelIter, PriceLevel};
pub use side_book::{BidBook, LevelKey, OfferBook, SideBook};
pub use book::OrderBook;
