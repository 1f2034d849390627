// End-to-end scenarios against the public library API.

use trayjudge::catalog::Catalog;
use trayjudge::decision::Status;
use trayjudge::detection::{BBox, Detection};
use trayjudge::engine::judge;

fn det(class_id: u32, name: &str, conf: f32, cx: f64, cy: f64, camera: &str) -> Detection {
    Detection {
        bbox: BBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0),
        confidence: conf,
        class_id,
        class_name: name.to_string(),
        camera_id: Some(camera.to_string()),
    }
}

#[test]
fn single_exact() {
    let catalog = Catalog::built_in();
    let dets = vec![
        det(0, "hand", 0.9, 280.0, 80.0, "top"),
        det(26, "chickenmayo_rice", 0.49, 300.0, 100.0, "top"),
    ];
    let result = judge(&dets, -365.0, true, &catalog);
    assert_eq!(result.status, Status::Complete);
    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].count, 1);
    assert_eq!(result.total_price, 3500);
    assert_eq!(result.weight_info.explained, 365.0);
    assert_eq!(result.weight_info.residual, 0.0);
}

#[test]
fn multi_count() {
    let catalog = Catalog::built_in();
    let dets = vec![det(9, "vita500", 0.85, 300.0, 100.0, "top")];
    let result = judge(&dets, -260.0, true, &catalog);
    assert_eq!(result.status, Status::Complete);
    assert_eq!(result.products[0].count, 2);
    assert_eq!(result.total_price, 2400);
}

#[test]
fn within_tolerance() {
    let catalog = Catalog::built_in();
    let dets = vec![det(26, "chickenmayo_rice", 0.49, 300.0, 100.0, "top")];
    let result = judge(&dets, -380.0, false, &catalog);
    assert_eq!(result.status, Status::Complete);
    assert_eq!(result.products[0].count, 1);
}

#[test]
fn no_change() {
    let catalog = Catalog::built_in();
    let dets = vec![det(26, "chickenmayo_rice", 0.49, 300.0, 100.0, "top")];
    let result = judge(&dets, -3.0, false, &catalog);
    assert_eq!(result.status, Status::NoDetection);
    assert!(result.products.is_empty());
}

#[test]
fn weight_mismatch_large() {
    let catalog = Catalog::built_in();
    let dets = vec![det(26, "chickenmayo_rice", 0.49, 300.0, 100.0, "top")];
    let result = judge(&dets, -500.0, false, &catalog);
    assert_eq!(result.status, Status::Partial);
    assert_eq!(result.products[0].count, 1);
}

#[test]
fn hand_filter_drops_far_product() {
    let catalog = Catalog::built_in();
    let dets = vec![
        det(0, "hand", 0.9, 280.0, 80.0, "top"),
        det(26, "chickenmayo_rice", 0.49, 600.0, 400.0, "top"),
    ];
    let result = judge(&dets, -365.0, true, &catalog);
    assert_eq!(result.status, Status::NoDetection);
    assert!(result.products.is_empty());
}
