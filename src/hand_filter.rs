//! # Hand Proximity Filter
//! Hands are a reliable proxy for "what the customer is actually touching";
//! detections elsewhere on the tray are likely background products. Pure,
//! I/O-free — same shape as the reference service's `disruption::evaluate`.

use crate::config::HAND_MAX_DISTANCE_PX;
use crate::detection::{distance, Detection};

/// Retain non-hand detections within `max_distance_px` of the nearest hand.
/// If no hand is present, every non-hand detection is retained unchanged.
pub fn filter_by_hand_proximity(detections: &[Detection], max_distance_px: f64) -> Vec<Detection> {
    let hand_centers: Vec<(f64, f64)> = detections
        .iter()
        .filter(|d| d.is_hand())
        .map(|d| d.bbox.center())
        .collect();

    let non_hand = detections.iter().filter(|d| !d.is_hand());

    if hand_centers.is_empty() {
        let retained: Vec<Detection> = non_hand.cloned().collect();
        tracing::debug!(retained = retained.len(), hands = 0, "hand filter: no hand present, retaining all");
        return retained;
    }

    let retained: Vec<Detection> = non_hand
        .filter(|d| {
            let center = d.bbox.center();
            let nearest = hand_centers
                .iter()
                .map(|&hc| distance(center, hc))
                .fold(f64::INFINITY, f64::min);
            nearest <= max_distance_px
        })
        .cloned()
        .collect();
    tracing::debug!(retained = retained.len(), hands = hand_centers.len(), "hand filter applied");
    retained
}

/// Convenience wrapper using the default radius (`HAND_MAX_DISTANCE_PX = 150`).
pub fn filter_by_hand_proximity_default(detections: &[Detection]) -> Vec<Detection> {
    filter_by_hand_proximity(detections, HAND_MAX_DISTANCE_PX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BBox;

    fn det(class_id: u32, name: &str, cx: f64, cy: f64) -> Detection {
        Detection {
            bbox: BBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0),
            confidence: 0.8,
            class_id,
            class_name: name.to_string(),
            camera_id: None,
        }
    }

    #[test]
    fn no_hand_returns_all_non_hand_detections() {
        let dets = vec![det(9, "vita500", 600.0, 400.0), det(26, "chickenmayo_rice", 10.0, 10.0)];
        let out = filter_by_hand_proximity(&dets, 150.0);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn drops_far_product_keeps_near_product() {
        let hand = det(0, "hand", 280.0, 80.0);
        let near = det(26, "chickenmayo_rice", 300.0, 100.0);
        let far = det(9, "vita500", 600.0, 400.0);
        let dets = vec![hand, near.clone(), far];
        let out = filter_by_hand_proximity(&dets, 150.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_name, "chickenmayo_rice");
    }

    #[test]
    fn multiple_hands_use_minimum_distance() {
        let hand_far = det(0, "hand", 0.0, 0.0);
        let hand_near = det(0, "hand", 290.0, 90.0);
        let product = det(26, "chickenmayo_rice", 300.0, 100.0);
        let dets = vec![hand_far, hand_near, product];
        let out = filter_by_hand_proximity(&dets, 50.0);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn identical_centers_are_retained() {
        let hand = det(0, "hand", 100.0, 100.0);
        let product = det(9, "vita500", 100.0, 100.0);
        let out = filter_by_hand_proximity(&[hand, product], 150.0);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn empty_input_returns_empty() {
        let out = filter_by_hand_proximity(&[], 150.0);
        assert!(out.is_empty());
    }

    #[test]
    fn is_idempotent() {
        let hand = det(0, "hand", 280.0, 80.0);
        let near = det(26, "chickenmayo_rice", 300.0, 100.0);
        let far = det(9, "vita500", 900.0, 900.0);
        let dets = vec![hand, near, far];
        let once = filter_by_hand_proximity(&dets, 150.0);
        let twice = filter_by_hand_proximity(&once, 150.0);
        assert_eq!(once, twice);
    }
}
