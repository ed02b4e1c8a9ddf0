//! Order types for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the book can hash its
//! contents deterministically (see `OrderBook::state_root`).
//! SSZ encoding rules:
//! - Basic types (u64, u8): Direct little-endian encoding
//! - Fixed-size composites: Concatenated little-endian fields
//!
//! ## Fixed-Point Representation
//!
//! Prices are stored as u64 scaled by 10^8 (see [`crate::types::price`]).
//! Sizes are plain integer quantities.

use std::fmt;

use ssz_rs::prelude::*;

use crate::error::{BookError, Result};
use crate::types::price;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid or Offer
///
/// Represented as u8 for SSZ compatibility:
/// - Bid = 0
/// - Offer = 1
///
/// The single-character tags `'B'` and `'O'` are accepted via `TryFrom<char>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy interest; best price is the highest
    #[default]
    Bid,
    /// Sell interest; best price is the lowest
    Offer,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Offer => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Offer),
            _ => None,
        }
    }

    /// Single-character tag: `'B'` or `'O'`
    pub fn as_char(self) -> char {
        match self {
            Side::Bid => 'B',
            Side::Offer => 'O',
        }
    }
}

impl TryFrom<char> for Side {
    type Error = BookError;

    fn try_from(tag: char) -> Result<Self> {
        match tag {
            'B' => Ok(Side::Bid),
            'O' => Ok(Side::Offer),
            other => Err(BookError::InvalidSide(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// `id` doubles as the arrival sequence: among orders at one price, the
/// lower id has time priority. Once an order is in the book only `size`
/// changes, through `OrderBook::modify_order_size`.
///
/// ## SSZ Layout
///
/// Fixed-size container of 25 bytes (8 + 8 + 1 + 8).
///
/// ## Example
///
/// ```
/// use limit_book::types::{Order, Side};
///
/// // Bid for 10 units at 100.00000000
/// let order = Order::new(1, Side::Bid, 10_000_000_000, 10);
/// assert_eq!(order.side(), Side::Bid);
/// assert_eq!(order.to_string(), "Order{id=1, price=100.0, side=B, size=10}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier, also the time-priority key
    pub id: u64,

    /// Price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Order side as u8 (0=Bid, 1=Offer)
    /// Stored as u8 for SSZ compatibility
    pub side_raw: u8,

    /// Quantity resting at this price
    pub size: u64,
}

impl Order {
    /// Create a new order with a fixed-point price
    pub fn new(id: u64, side: Side, price: u64, size: u64) -> Self {
        Self {
            id,
            price,
            side_raw: side.to_u8(),
            size,
        }
    }

    /// Create a new order from a binary floating-point price
    ///
    /// The price is rounded to 8 decimal places before it is stored.
    ///
    /// # Errors
    ///
    /// `BookError::InvalidPrice` for NaN, infinite, negative or out-of-range prices.
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::types::{Order, Side};
    ///
    /// let order = Order::from_f64(1, Side::Offer, 100.0, 1).unwrap();
    /// assert_eq!(order.price, 10_000_000_000);
    /// assert!(Order::from_f64(2, Side::Offer, f64::NAN, 1).is_err());
    /// ```
    pub fn from_f64(id: u64, side: Side, price: f64, size: u64) -> Result<Self> {
        let fixed = price::from_f64(price)
            .ok_or_else(|| BookError::InvalidPrice(price.to_string()))?;
        Ok(Self::new(id, side, fixed, size))
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Bid)
    }

    /// Price as f64, for display only
    pub fn price_f64(&self) -> f64 {
        price::to_f64(self.price)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut price = price::from_fixed_trimmed(self.price);
        if !price.contains('.') {
            price.push_str(".0");
        }
        write!(
            f,
            "Order{{id={}, price={}, side={}, size={}}}",
            self.id,
            price,
            self.side(),
            self.size
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
