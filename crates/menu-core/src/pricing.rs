//! # Pricing
//!
//! The item's derived total. There is no stored column for it; every read
//! goes through [`total_amount`].

/// `base_amount - discount`.
///
/// A discount larger than the base amount is not rejected, so the result
/// may be negative.
///
/// ## Example
/// ```rust
/// use menu_core::pricing::total_amount;
///
/// assert_eq!(total_amount(120.0, 20.0), 100.0);
/// ```
#[inline]
pub fn total_amount(base_amount: f64, discount: f64) -> f64 {
    base_amount - discount
}
