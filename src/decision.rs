//! # Decision Result Types
//! The output value of one fusion decision. Built once per request and
//! discarded after the response is serialized — no persisted state.

use serde::Serialize;

/// Outcome classification for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Complete,
    Partial,
    Uncertain,
    NoDetection,
}

impl Status {
    /// `success = true` iff `status` is `complete` or `partial`.
    pub fn is_success(self) -> bool {
        matches!(self, Status::Complete | Status::Partial)
    }
}

/// Weight accounting for the chosen combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightInfo {
    /// Signed grams as received; negative = removal.
    pub delta: f64,
    /// Non-negative grams accounted for by the chosen combination.
    pub explained: f64,
    /// `|delta| - explained`, non-negative.
    pub residual: f64,
}

/// One matched product line in the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_id: u32,
    pub name: String,
    pub count: u32,
    pub unit_price: i64,
    pub total_price: i64,
    pub confidence: f32,
}

/// The result of one fusion decision, serialized camelCase at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub success: bool,
    pub status: Status,
    pub products: Vec<ProductLine>,
    pub total_price: i64,
    pub confidence: f32,
    pub weight_info: WeightInfo,
    pub product_count: u32,
    pub is_removal: bool,
    pub timestamp: f64,
}

impl DecisionResult {
    /// The `no_detection` outcome: empty products, zero confidence.
    pub fn no_detection(delta: f64, timestamp: f64) -> Self {
        Self {
            success: false,
            status: Status::NoDetection,
            products: Vec::new(),
            total_price: 0,
            confidence: 0.0,
            weight_info: WeightInfo {
                delta,
                explained: 0.0,
                residual: delta.abs(),
            },
            product_count: 0,
            is_removal: delta < 0.0,
            timestamp,
        }
    }
}
