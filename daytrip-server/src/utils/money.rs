//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal`, then converted back to `f64`
//! (2 decimal places, half-up) for storage and serialization.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price × quantity`
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Per-head gratuity: `pax × rate`
pub fn gratuity_fee(pax_count: i64, rate_per_pax: f64) -> f64 {
    to_f64(Decimal::from(pax_count) * to_decimal(rate_per_pax))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_rounds_half_up() {
        assert_eq!(line_total(19.99, 3), 59.97);
        assert_eq!(line_total(33.333, 3), 100.0);
        assert_eq!(line_total(120.0, 0), 0.0);
    }

    #[test]
    fn test_gratuity_fee() {
        assert_eq!(gratuity_fee(3, 5.0), 15.0);
        assert_eq!(gratuity_fee(0, 5.0), 0.0);
        assert_eq!(gratuity_fee(7, 2.5), 17.5);
    }
}
