//! # HTTP API Layer
//! Boundary between loosely-typed JSON and the pure decision core. Schema
//! violations are rejected here as 4xx; everything else the core can
//! produce is a normal 200 with a structured status.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::decision::DecisionResult;
use crate::detection::{BBox, Detection};
use crate::engine;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

pub fn create_router(catalog: Catalog) -> Router {
    let state = AppState { catalog: Arc::new(catalog) };

    Router::new()
        .route("/health", get(health))
        .route("/judge", post(judge))
        .route("/catalog", get(list_catalog))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub struct JudgeInput {
    detections: Vec<Detection>,
    delta_weight: f64,
    #[serde(default = "default_use_hand_filter")]
    use_hand_filter: bool,
}

fn default_use_hand_filter() -> bool {
    true
}

/// Schema-level rejections, translated to HTTP 4xx at the boundary. The
/// core itself never raises for domain-valid input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("delta_weight must be finite")]
    NonFiniteWeight,
    #[error("detection[{index}] has a non-finite or inverted bounding box")]
    InvalidBBox { index: usize },
    #[error("detection[{index}] confidence {confidence} is outside [0, 1]")]
    InvalidConfidence { index: usize, confidence: f32 },
    #[error("detection[{index}] is missing a class name and is not a hand (cls=0)")]
    MissingClassName { index: usize },
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

fn validate_detection(d: &Detection, index: usize) -> Result<(), ValidationError> {
    if !d.bbox.is_valid() {
        return Err(ValidationError::InvalidBBox { index });
    }
    if !d.confidence.is_finite() || !(0.0..=1.0).contains(&d.confidence) {
        return Err(ValidationError::InvalidConfidence { index, confidence: d.confidence });
    }
    if !d.is_hand() && d.class_name.is_empty() {
        return Err(ValidationError::MissingClassName { index });
    }
    Ok(())
}

async fn judge(
    State(state): State<AppState>,
    Json(input): Json<JudgeInput>,
) -> Result<Json<DecisionResult>, ValidationError> {
    let t0 = Instant::now();

    if !input.delta_weight.is_finite() {
        return Err(ValidationError::NonFiniteWeight);
    }

    for (i, d) in input.detections.iter().enumerate() {
        validate_detection(d, i)?;
    }

    let result = engine::judge(&input.detections, input.delta_weight, input.use_hand_filter, &state.catalog);

    tracing::info!(
        status = ?result.status,
        product_count = result.product_count,
        latency_ms = t0.elapsed().as_millis(),
        "judge request handled"
    );

    Ok(Json(result))
}

#[derive(Debug, Serialize)]
struct CatalogEntryOut {
    id: u32,
    name: String,
    #[serde(rename = "unitWeightG")]
    unit_weight_g: f64,
    #[serde(rename = "unitPrice")]
    unit_price: i64,
    category: crate::catalog::Category,
}

async fn list_catalog(State(state): State<AppState>) -> Json<Vec<CatalogEntryOut>> {
    let mut entries: Vec<CatalogEntryOut> = state
        .catalog
        .all()
        .map(|p| CatalogEntryOut {
            id: p.id,
            name: p.name.clone(),
            unit_weight_g: p.unit_weight_g,
            unit_price: p.unit_price,
            category: p.category,
        })
        .collect();
    entries.sort_by_key(|e| e.id);
    Json(entries)
}
