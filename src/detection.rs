//! # Detection Model
//! One raw observation from one camera frame. Structurally complete — the
//! HTTP boundary is responsible for translating loosely-typed JSON into this
//! shape and rejecting anything malformed.

use serde::{Deserialize, Serialize};

use crate::config::HAND_CLASS_ID;

/// Axis-aligned bounding box in pixel coordinates, `x1 <= x2 && y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// `true` iff the box obeys `x1 <= x2 && y1 <= y2` and all coordinates are finite.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite())
            && self.x1 <= self.x2
            && self.y1 <= self.y2
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn area(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }
}

/// One object-detector observation from one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    pub confidence: f32,
    pub class_id: u32,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
}

impl Detection {
    pub fn is_hand(&self) -> bool {
        self.class_id == HAND_CLASS_ID
    }

    /// `true` iff bbox, confidence, and class_name are all well-formed. The
    /// boundary uses this to reject input before it reaches the pure core.
    pub fn is_valid(&self) -> bool {
        self.bbox.is_valid()
            && self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
            && (self.is_hand() || !self.class_name.is_empty())
    }

    pub fn camera_key(&self) -> &str {
        self.camera_id.as_deref().unwrap_or("default")
    }
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}
