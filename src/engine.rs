//! # Decision Engine
//! Pure, testable orchestration: detections + delta-weight -> `DecisionResult`.
//! No I/O; suitable for unit tests and offline replay.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::Catalog;
use crate::combination::{find_best_combination, MatchedTuple};
use crate::config::{
    COMPLETE_MIN_SCORE, CONFIDENCE_VISION_WEIGHT, CONFIDENCE_WEIGHT_FIT_WEIGHT, MIN_DELTA_WEIGHT_G,
};
use crate::decision::{DecisionResult, ProductLine, Status, WeightInfo};
use crate::detection::Detection;
use crate::ensemble::{ensemble_candidates, top_k_default, Candidate};
use crate::hand_filter::filter_by_hand_proximity_default;

/// Run one full decision: partition by camera, filter, ensemble, match, classify.
pub fn judge(detections: &[Detection], delta_weight: f64, use_hand_filter: bool, catalog: &Catalog) -> DecisionResult {
    let timestamp = wall_clock_seconds();
    let w = delta_weight.abs();

    if w < MIN_DELTA_WEIGHT_G {
        return DecisionResult::no_detection(delta_weight, timestamp);
    }

    let by_camera = partition_by_camera(detections);
    let mut per_camera_top_k: HashMap<String, Vec<Detection>> = HashMap::with_capacity(by_camera.len());
    for (camera, cam_detections) in by_camera {
        let filtered = if use_hand_filter {
            filter_by_hand_proximity_default(&cam_detections)
        } else {
            cam_detections.into_iter().filter(|d| !d.is_hand()).collect()
        };
        per_camera_top_k.insert(camera, top_k_default(&filtered));
    }

    let candidates = ensemble_candidates(&per_camera_top_k, catalog);
    if candidates.is_empty() {
        return DecisionResult::no_detection(delta_weight, timestamp);
    }

    // No candidate carries a known catalog weight: there is no tuple to
    // report against, so this is `no_detection` per I4, not `uncertain`.
    let Some(best) = find_best_combination(&candidates, w, catalog) else {
        return DecisionResult::no_detection(delta_weight, timestamp);
    };
    let top_score = candidates.iter().map(|c| c.fused_score).fold(f32::MIN, f32::max);

    let status = classify_status(&best, top_score, w);

    let products = build_products(&best, &candidates, catalog);
    let total_price: i64 = products.iter().map(|p| p.total_price).sum();
    let product_count: u32 = products.iter().map(|p| p.count).sum();

    let explained = best.expected.max(0.0);
    let residual = (w - explained).max(0.0);
    let error_g = best.error_g;
    let weight_fit = (1.0 - error_g / w.max(1.0)).max(0.0) as f32;
    let avg_fused_score = candidates.iter().map(|c| c.fused_score).sum::<f32>() / candidates.len() as f32;
    let confidence = (CONFIDENCE_VISION_WEIGHT * avg_fused_score + CONFIDENCE_WEIGHT_FIT_WEIGHT * weight_fit).clamp(0.0, 1.0);

    DecisionResult {
        success: status.is_success(),
        status,
        products,
        total_price,
        confidence,
        weight_info: WeightInfo { delta: delta_weight, explained, residual },
        product_count,
        is_removal: delta_weight < 0.0,
        timestamp,
    }
}

fn partition_by_camera(detections: &[Detection]) -> HashMap<String, Vec<Detection>> {
    let mut by_camera: HashMap<String, Vec<Detection>> = HashMap::new();
    for d in detections {
        by_camera.entry(d.camera_key().to_string()).or_default().push(d.clone());
    }
    by_camera
}

/// `complete` iff within tolerance and top candidate score clears the bar;
/// `partial` iff the tuple explains at least half the weight without being
/// within tolerance; `uncertain` iff a tuple exists but neither applies.
/// Callers only reach this with a chosen tuple in hand — the "no tuple"
/// case is `no_detection` and is handled before this is called (I4).
fn classify_status(tuple: &MatchedTuple, top_score: f32, w: f64) -> Status {
    if tuple.within && top_score >= COMPLETE_MIN_SCORE {
        Status::Complete
    } else if !tuple.within && tuple.error_g <= 2.0 * tuple.combined_tolerance_g && tuple.expected >= 0.5 * w {
        Status::Partial
    } else {
        Status::Uncertain
    }
}

fn build_products(tuple: &MatchedTuple, candidates: &[Candidate], catalog: &Catalog) -> Vec<ProductLine> {
    let score_by_id: HashMap<u32, f32> = candidates.iter().map(|c| (c.product_id, c.fused_score)).collect();

    let mut lines: Vec<ProductLine> = tuple
        .product_ids
        .iter()
        .zip(&tuple.counts)
        .filter_map(|(&id, &count)| {
            let product = catalog.lookup_by_id(id)?;
            let confidence = score_by_id.get(&id).copied().unwrap_or(0.0).clamp(0.0, 1.0);
            Some(ProductLine {
                product_id: id,
                name: product.name.clone(),
                count,
                unit_price: product.unit_price,
                total_price: product.unit_price * count as i64,
                confidence,
            })
        })
        .collect();

    lines.sort_by(|a, b| {
        let score_a = score_by_id.get(&a.product_id).copied().unwrap_or(0.0);
        let score_b = score_by_id.get(&b.product_id).copied().unwrap_or(0.0);
        score_b.total_cmp(&score_a)
    });
    lines
}

fn wall_clock_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
