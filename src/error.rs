//! Error types for order book operations.
//!
//! Only contract violations are errors. Expected misses (cancelling an id
//! that already left the book, asking for a level deeper than the book) are
//! reported as `None` or `0` by the operations themselves.

use thiserror::Error;

/// Errors reported by the order book and its conversion helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// An order with this id is already resting in the book.
    #[error("order id {0} is already resting in the book")]
    DuplicateOrderId(u64),

    /// Level queries are 1-indexed; level 0 does not exist.
    #[error("level must be 1 or greater, got {0}")]
    InvalidLevel(usize),

    /// Price could not be converted to the fixed-point representation.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Unknown side tag.
    #[error("invalid side tag {0:?}, expected 'B' or 'O'")]
    InvalidSide(char),

    /// Raw side byte is neither Bid (0) nor Offer (1).
    #[error("invalid side code {0}, expected 0 (bid) or 1 (offer)")]
    InvalidSideCode(u8),

    /// SSZ encoding failed while computing the state root.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The id index and the side books disagree.
    #[error("book integrity violated: {0}")]
    Integrity(String),
}

/// Result type for order book operations
pub type Result<T, E = BookError> = std::result::Result<T, E>;
