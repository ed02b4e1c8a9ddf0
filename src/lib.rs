//! # Limit Book
//!
//! In-memory limit order book with price/time priority.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Side) and fixed-point prices
//! - **OrderBook**: Slab-backed bid and offer sides with an id index
//! - **Error**: Typed contract violations
//!
//! ## Design Principles
//!
//! 1. **Exact price keys**: Prices are fixed-point integers (10^8 scaling)
//! 2. **Time priority by id**: Lower id ranks first within a price level
//! 3. **Contiguous levels**: Empty price levels are pruned immediately
//! 4. **No matching**: Liquidity leaves only by explicit removal
//!
//! The book is synchronous and holds no locks; a caller sharing it across
//! threads guards the whole `OrderBook` behind one lock.

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Side, price conversion
pub mod types;

/// Order book: levels, sides, and the public API
pub mod orderbook;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{BookError, Result};
pub use orderbook::{OrderBook, PriceLevel};
pub use types::{Order, Side};
