//! Closed-set constants for the decision core.
//!
//! None of these are runtime-configurable: fixed design constants, not a
//! hot-reloadable config layer. This mirrors the shape of the reference
//! service's threshold constants, minus the hot-reload machinery used there
//! for values this core deliberately keeps static (see DESIGN.md).

/// Reserved class id for a hand detection.
pub const HAND_CLASS_ID: u32 = 0;

/// Per-camera top-K retained after confidence ranking.
pub const TOP_K: usize = 5;

/// Maximum per-product integer count searched by the combination matcher.
pub const C_MAX: u32 = 5;

/// Largest product subset size searched by the combination matcher.
pub const MAX_SUBSET_SIZE: usize = 2;

/// Default hand proximity radius in pixels.
pub const HAND_MAX_DISTANCE_PX: f64 = 150.0;

/// Minimum |delta_weight| in grams to leave the "no change" state.
pub const MIN_DELTA_WEIGHT_G: f64 = 5.0;

/// Cross-view ensemble bonus factor.
pub const CROSS_VIEW_BONUS: f32 = 0.15;

/// Minimum top candidate fused score required for a `complete` status.
pub const COMPLETE_MIN_SCORE: f32 = 0.40;

/// Weight given to vision (fused score) vs. weight-fit in the confidence blend.
pub const CONFIDENCE_VISION_WEIGHT: f32 = 0.5;
pub const CONFIDENCE_WEIGHT_FIT_WEIGHT: f32 = 0.5;
