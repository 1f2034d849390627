//! # Top-K Extractor & Multi-View Ensemble
//! Per-camera ranking followed by cross-camera fusion with a bonus for
//! classes seen in multiple views — low-confidence single-view detections
//! are unreliable; cross-view agreement is stronger evidence.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::{CROSS_VIEW_BONUS, TOP_K};
use crate::detection::Detection;

/// An ensembled product hypothesis for one decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub product_id: u32,
    pub name: String,
    /// May exceed 1.0 after the cross-view bonus; comparison-only.
    pub fused_score: f32,
    pub camera_set: BTreeSet<String>,
}

/// Sort detections by confidence desc, bbox area desc, class_id asc, then
/// keep the first `k`. Deterministic under ties.
pub fn top_k(detections: &[Detection], k: usize) -> Vec<Detection> {
    let mut sorted = detections.to_vec();
    sorted.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.bbox.area().total_cmp(&a.bbox.area()))
            .then_with(|| a.class_id.cmp(&b.class_id))
    });
    sorted.truncate(k);
    sorted
}

/// Convenience wrapper using the default `K = 5`.
pub fn top_k_default(detections: &[Detection]) -> Vec<Detection> {
    top_k(detections, TOP_K)
}

/// Fuse per-camera top-K lists into a single ranked candidate list.
///
/// 1. `base_score` per class = max confidence seen across cameras.
/// 2. Classes seen in >= 2 cameras get the cross-view bonus.
/// 3. Classes absent from the catalog are discarded.
/// 4. At most `K` candidates are returned, sorted by score desc / class_id asc.
pub fn ensemble_candidates(
    per_camera_top_k: &HashMap<String, Vec<Detection>>,
    catalog: &Catalog,
) -> Vec<Candidate> {
    struct Acc {
        name: String,
        base_score: f32,
        cameras: BTreeSet<String>,
    }

    let mut by_class: HashMap<u32, Acc> = HashMap::new();

    for (camera, detections) in per_camera_top_k {
        for d in detections {
            if d.is_hand() {
                continue;
            }
            let entry = by_class.entry(d.class_id).or_insert_with(|| Acc {
                name: d.class_name.clone(),
                base_score: 0.0,
                cameras: BTreeSet::new(),
            });
            if d.confidence > entry.base_score {
                entry.base_score = d.confidence;
                entry.name = d.class_name.clone();
            }
            entry.cameras.insert(camera.clone());
        }
    }

    let mut candidates: Vec<Candidate> = by_class
        .into_iter()
        .filter(|(class_id, acc)| {
            let known = catalog.lookup_by_id(*class_id).is_some();
            if !known {
                tracing::warn!(class_id, name = %acc.name, "dropping detection for unknown catalog class");
            }
            known
        })
        .map(|(class_id, acc)| {
            let n_cameras_seen = acc.cameras.len();
            let fused_score = if n_cameras_seen >= 2 {
                acc.base_score * (1.0 + CROSS_VIEW_BONUS * (n_cameras_seen as f32 - 1.0))
            } else {
                acc.base_score
            };
            Candidate {
                product_id: class_id,
                name: acc.name,
                fused_score,
                camera_set: acc.cameras,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.fused_score
            .total_cmp(&a.fused_score)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    candidates.truncate(TOP_K);
    tracing::debug!(cameras = per_camera_top_k.len(), candidates = candidates.len(), "ensembled candidate list built");
    candidates
}
