//! Combination Matcher
//! Bounded brute-force search over small multi-product integer count
//! combinations that explain an observed weight delta within tolerance.
//! Deterministic and exhaustive at this problem size — no heuristic pruning.

use crate::catalog::Catalog;
use crate::config::{C_MAX, MAX_SUBSET_SIZE};
use crate::ensemble::Candidate;

/// One scored hypothesis: a subset of candidates, each with an integer count.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedTuple {
    pub product_ids: Vec<u32>,
    pub counts: Vec<u32>,
    pub expected: f64,
    pub error_g: f64,
    pub combined_tolerance_g: f64,
    pub within: bool,
    pub rank_score: f32,
    pub tuple_score: f64,
}

struct WeightEligible<'a> {
    candidate: &'a Candidate,
    unit_weight_g: f64,
    tolerance: f64,
}

/// Search for the best-scoring (products, counts) tuple explaining `w`.
///
/// Returns `None` when no candidate carries a known catalog weight ("no
/// weight match" per the matcher's special case).
pub fn find_best_combination(candidates: &[Candidate], w: f64, catalog: &Catalog) -> Option<MatchedTuple> {
    let eligible: Vec<WeightEligible> = candidates
        .iter()
        .filter_map(|c| {
            let product = catalog.lookup_by_id(c.product_id)?;
            if !product.has_known_weight() {
                return None;
            }
            Some(WeightEligible {
                candidate: c,
                unit_weight_g: product.unit_weight_g,
                tolerance: catalog.tolerance_of(product.category),
            })
        })
        .collect();

    if eligible.is_empty() {
        tracing::debug!("combination matcher: no weight-eligible candidate");
        return None;
    }

    let mut best: Option<MatchedTuple> = None;

    // subset size 1
    for item in &eligible {
        for count in 1..=C_MAX {
            let tuple = score_tuple(&[item], &[count], w);
            best = pick_better(best, tuple);
        }
    }

    // subset size 2: distinct unordered pairs
    if MAX_SUBSET_SIZE >= 2 {
        for i in 0..eligible.len() {
            for j in (i + 1)..eligible.len() {
                for c1 in 1..=C_MAX {
                    for c2 in 1..=C_MAX {
                        let tuple = score_tuple(&[&eligible[i], &eligible[j]], &[c1, c2], w);
                        best = pick_better(best, tuple);
                    }
                }
            }
        }
    }

    if let Some(tuple) = &best {
        tracing::debug!(
            product_ids = ?tuple.product_ids,
            counts = ?tuple.counts,
            error_g = tuple.error_g,
            within = tuple.within,
            "combination matcher chose tuple"
        );
    }
    best
}

fn score_tuple(items: &[&WeightEligible], counts: &[u32], w: f64) -> MatchedTuple {
    let expected: f64 = items
        .iter()
        .zip(counts)
        .map(|(item, &c)| c as f64 * item.unit_weight_g)
        .sum();
    let error_g = (w - expected).abs();
    let combined_tolerance_g: f64 = items
        .iter()
        .zip(counts)
        .map(|(item, &c)| c as f64 * item.unit_weight_g * item.tolerance)
        .sum();
    let within = error_g <= combined_tolerance_g;
    let rank_score: f32 = items.iter().map(|item| item.candidate.fused_score).sum();
    let tuple_score = (if within { 10.0 } else { 0.0 }) + rank_score as f64 - (error_g / w.max(1.0));

    MatchedTuple {
        product_ids: items.iter().map(|i| i.candidate.product_id).collect(),
        counts: counts.to_vec(),
        expected,
        error_g,
        combined_tolerance_g,
        within,
        rank_score,
        tuple_score,
    }
}

/// Replace `current` with `candidate` when candidate scores strictly higher,
/// or ties with a smaller subset, or ties further with a smaller error_g.
fn pick_better(current: Option<MatchedTuple>, candidate: MatchedTuple) -> Option<MatchedTuple> {
    match current {
        None => Some(candidate),
        Some(cur) => {
            let better = match candidate.tuple_score.partial_cmp(&cur.tuple_score) {
                Some(std::cmp::Ordering::Greater) => true,
                Some(std::cmp::Ordering::Less) => false,
                _ => {
                    if candidate.counts.len() != cur.counts.len() {
                        candidate.counts.len() < cur.counts.len()
                    } else {
                        candidate.error_g < cur.error_g
                    }
                }
            };
            Some(if better { candidate } else { cur })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::collections::BTreeSet;

    fn candidate(product_id: u32, name: &str, fused_score: f32) -> Candidate {
        Candidate {
            product_id,
            name: name.to_string(),
            fused_score,
            camera_set: BTreeSet::new(),
        }
    }

    #[test]
    fn single_exact_match_is_within_tolerance() {
        let catalog = Catalog::built_in();
        let candidates = vec![candidate(26, "chickenmayo_rice", 0.49)];
        let best = find_best_combination(&candidates, 365.0, &catalog).unwrap();
        assert_eq!(best.product_ids, vec![26]);
        assert_eq!(best.counts, vec![1]);
        assert!(best.within);
        assert!((best.error_g - 0.0).abs() < 1e-6);
    }

    #[test]
    fn multi_count_match_prefers_exact_count() {
        let catalog = Catalog::built_in();
        let candidates = vec![candidate(9, "vita500", 0.85)];
        let best = find_best_combination(&candidates, 260.0, &catalog).unwrap();
        assert_eq!(best.counts, vec![2]);
        assert!(best.within);
    }

    #[test]
    fn within_tolerance_small_error_still_matches() {
        let catalog = Catalog::built_in();
        let candidates = vec![candidate(26, "chickenmayo_rice", 0.40)];
        let best = find_best_combination(&candidates, 380.0, &catalog).unwrap();
        assert_eq!(best.counts, vec![1]);
        assert!(best.within);
    }

    #[test]
    fn large_mismatch_is_not_within_tolerance() {
        let catalog = Catalog::built_in();
        let candidates = vec![candidate(26, "chickenmayo_rice", 0.40)];
        let best = find_best_combination(&candidates, 500.0, &catalog).unwrap();
        assert_eq!(best.counts, vec![1]);
        assert!(!best.within);
        assert!((best.expected - 365.0).abs() < 1e-9);
    }

    #[test]
    fn no_weight_eligible_candidate_returns_none() {
        let catalog = Catalog::built_in();
        // product 999_999 is not in the catalog -> no weight-eligible candidate.
        let candidates = vec![candidate(999_999, "unknown_widget", 0.9)];
        assert!(find_best_combination(&candidates, 100.0, &catalog).is_none());
    }

    #[test]
    fn two_product_pair_explains_weight_no_single_product_can() {
        // w = 130 + 365: every single-product count for either item leaves
        // a sizeable error, but the pair at (1, 1) explains it exactly, so
        // the size-2 search must be the one that finds it.
        let catalog = Catalog::built_in();
        let candidates = vec![candidate(9, "vita500", 0.60), candidate(26, "chickenmayo_rice", 0.50)];
        let best = find_best_combination(&candidates, 495.0, &catalog).unwrap();
        assert_eq!(best.product_ids, vec![9, 26]);
        assert_eq!(best.counts, vec![1, 1]);
        assert!(best.within);
        assert!((best.error_g - 0.0).abs() < 1e-6);
    }

    fn tuple(product_ids: Vec<u32>, counts: Vec<u32>, tuple_score: f64, error_g: f64) -> MatchedTuple {
        MatchedTuple {
            product_ids,
            counts,
            expected: 0.0,
            error_g,
            combined_tolerance_g: 0.0,
            within: false,
            rank_score: 0.0,
            tuple_score,
        }
    }

    #[test]
    fn pick_better_prefers_smaller_subset_on_tied_score() {
        let singleton = tuple(vec![9], vec![1], 5.0, 10.0);
        let pair = tuple(vec![9, 26], vec![1, 1], 5.0, 5.0);

        // singleton first, tied pair arrives second: stays with singleton.
        let result = pick_better(Some(singleton.clone()), pair.clone());
        assert_eq!(result.unwrap().counts.len(), 1);

        // pair first, tied singleton arrives second: switches to singleton.
        let result = pick_better(Some(pair), singleton);
        assert_eq!(result.unwrap().counts.len(), 1);
    }

    #[test]
    fn pick_better_prefers_smaller_error_when_subset_size_also_ties() {
        let worse = tuple(vec![9], vec![1], 5.0, 10.0);
        let better = tuple(vec![9], vec![2], 5.0, 3.0);

        let result = pick_better(Some(worse), better);
        assert!((result.unwrap().error_g - 3.0).abs() < 1e-9);
    }
}
