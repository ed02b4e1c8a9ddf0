//! Core data types for the limit order book
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Bid or Offer
//!
//! ## Fixed-Point Arithmetic
//!
//! Prices are stored as `u64` scaled by 10^8.
//! Example: 100.5 is stored as 10_050_000_000u64

mod order;
pub mod price;

pub use order::{Order, Side};
