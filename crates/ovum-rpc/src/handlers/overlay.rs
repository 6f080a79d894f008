//! Detection overlay geometry handlers.

use crate::handlers::{get_f64_param, parse_payload};
use crate::server::AppState;
use ovum_client::records::Detection;
use ovum_client::{overlay, OvumError};
use serde_json::{json, Value};

/// Project detection boxes into percentage coordinates for display, and,
/// when container dimensions are supplied, compute the letterboxed
/// rectangle an object-fit: contain rendering would occupy.
pub async fn project_overlay(_state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let detections: Vec<Detection> = parse_payload(params, "detections")?;
    let natural_width = require_f64(params, "natural_width", "naturalWidth")?;
    let natural_height = require_f64(params, "natural_height", "naturalHeight")?;

    let boxes = overlay::project_detections(&detections, natural_width, natural_height);

    let container_width = get_f64_param(params, "container_width", "containerWidth");
    let container_height = get_f64_param(params, "container_height", "containerHeight");
    let rendered_box = match (container_width, container_height) {
        (Some(cw), Some(ch)) => {
            overlay::rendered_image_box(natural_width, natural_height, cw, ch)
        }
        _ => None,
    };

    Ok(json!({
        "boxes": boxes,
        "renderedBox": rendered_box,
    }))
}

fn require_f64(params: &Value, snake: &str, camel: &str) -> ovum_client::Result<f64> {
    get_f64_param(params, snake, camel).ok_or_else(|| OvumError::InvalidParams {
        message: format!("Missing required parameter: {}", snake),
    })
}
