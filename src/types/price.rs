//! Fixed-point price utilities.
//!
//! ## Overview
//!
//! Prices are stored as u64 scaled by 10^8 and used directly as price level
//! keys. Two prices land in the same level if and only if their fixed-point
//! values are equal, so no tolerance is ever applied when bucketing.
//!
//! ## Floating-Point Input
//!
//! Callers holding binary floating-point prices go through [`from_f64`],
//! which rounds to 8 decimal places before keying. `100.1` and `100.10000000001`
//! therefore land in the same level, while `100.1` and `100.10000001` do not.
//!
//! ## Examples
//!
//! ```
//! use limit_book::types::price::{to_fixed, from_fixed, from_f64};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//!
//! assert_eq!(from_f64(100.0), Some(10_000_000_000));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point prices: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

/// Number of decimal places kept by the fixed-point representation
pub const DECIMALS: u32 = 8;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If parsing fails or value is out of range
///
/// # Example
///
/// ```
/// use limit_book::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a binary floating-point price to fixed-point u64
///
/// The value is rounded to [`DECIMALS`] places (banker's rounding).
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - For NaN, infinities, negative values, or values out of range
///
/// # Example
///
/// ```
/// use limit_book::types::price::from_f64;
///
/// assert_eq!(from_f64(100.0), Some(10_000_000_000));
/// assert_eq!(from_f64(0.1), Some(10_000_000));
/// assert_eq!(from_f64(f64::NAN), None);
/// ```
pub fn from_f64(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    let decimal = Decimal::from_f64(value)?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If value is negative or out of range
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// # Example
///
/// ```
/// use limit_book::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
/// ```
pub fn from_fixed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{:.8}", decimal)
}

/// Convert fixed-point u64 to a human-readable string (trimmed trailing zeros)
///
/// # Example
///
/// ```
/// use limit_book::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(10_000_000_000), "100");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

/// Convert fixed-point u64 back to f64 for display or analytics
///
/// Lossy above 2^53 / 10^8; never use the result as a level key.
pub fn to_f64(value: u64) -> f64 {
    fixed_to_decimal(value).to_f64().unwrap_or(f64::NAN)
}

// ============================================================================
// Unit Tests
// ============================================================================
