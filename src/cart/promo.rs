//! Promo code lookup

use rust_decimal::Decimal;

/// Message shown when a code is not in the lookup table
pub const INVALID_PROMO_MESSAGE: &str = "Promo code is invalid.";

/// Known codes and the percentage of the subtotal they take off
const PROMO_CODES: &[(&str, u32)] = &[("DISCOUNT10", 10), ("DISCOUNT30", 30)];

/// Fraction of the subtotal granted by `code`, if it is known.
///
/// Matching is exact and case-sensitive.
pub fn discount_rate(code: &str) -> Option<Decimal> {
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, percent)| Decimal::from(*percent) / Decimal::ONE_HUNDRED)
}

/// Result of applying a promo code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoOutcome {
    /// The code was valid; `discount` is the absolute amount taken off
    Applied { discount: Decimal },
    /// The code was rejected and the error message set
    Invalid,
}
