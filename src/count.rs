//! Count Calculator
//! Converts a measured weight delta into an integer product count for a
//! single product, given its catalog unit weight and category tolerance.

use crate::catalog::Product;

/// Result of fitting a weight delta to an integer count of one product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountResult {
    pub count: u32,
    pub within_tolerance: bool,
    /// Signed: `w - count * unit_weight_g`. Zero when the product has no
    /// known unit weight.
    pub error_g: f64,
}

/// Fit a measured weight `w` (grams) to an integer count of `product`.
///
/// Returns `None` when `product.unit_weight_g <= 0` — the count calculator
/// has no basis for converting weight into a count for such a product.
pub fn calculate_count(product: &Product, w: f64, tolerance_fraction: f64) -> Option<CountResult> {
    if !product.has_known_weight() {
        return None;
    }
    let unit = product.unit_weight_g;
    let raw_count = w / unit;
    let count = raw_count.round().max(0.0) as u32;
    let expected = count as f64 * unit;
    let error_g = w - expected;
    let allowed = expected * tolerance_fraction;
    Some(CountResult {
        count,
        within_tolerance: count >= 1 && error_g.abs() <= allowed,
        error_g,
    })
}
