//! Shopping Cart Business Logic Helpers
//!
//! This module contains the pricing formulas and formatting helpers shared by
//! the store and the routes.

use super::models::CartLineItem;
use rust_decimal::Decimal;

/// Unit price after applying a percentage discount.
///
/// `price × (1 − discount_percentage / 100)`, `None` when the result does not
/// fit in a `Decimal`.
pub fn effective_price(price: Decimal, discount_percentage: Decimal) -> Option<Decimal> {
    let fraction = discount_percentage.checked_div(Decimal::ONE_HUNDRED)?;
    price.checked_mul(Decimal::ONE.checked_sub(fraction)?)
}

/// Effective price of the line times its quantity
pub fn line_subtotal(item: &CartLineItem) -> Option<Decimal> {
    item.product
        .effective_price()?
        .checked_mul(Decimal::from(item.quantity))
}

/// Undiscounted price of the line times its quantity
pub fn line_original(item: &CartLineItem) -> Option<Decimal> {
    item.product.price.checked_mul(Decimal::from(item.quantity))
}

/// Sum of all line subtotals, before any promo discount
pub fn subtotal(items: &[CartLineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(line_subtotal(item)?))
}

/// Id of the first line whose amounts, or whose contribution to the
/// subtotal, do not fit in a `Decimal`.
pub fn first_overflowing_line(items: &[CartLineItem]) -> Option<u64> {
    let mut sum = Decimal::ZERO;
    for item in items {
        let next = line_original(item)
            .and(line_subtotal(item))
            .and_then(|line| sum.checked_add(line));
        match next {
            Some(next) => sum = next,
            None => return Some(item.id()),
        }
    }
    None
}

/// Lowercases `title` and replaces each whitespace run with a single `-`.
///
/// Example: `"Essence  Mascara Lash"` becomes `"essence-mascara-lash"`.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Lamp, 1x Cup"`.
pub fn format_item_summary(items: &[CartLineItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product.title))
        .collect::<Vec<_>>()
        .join(", ")
}
