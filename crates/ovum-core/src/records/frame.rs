//! Frame records: per-image detection and evaluation results.

use serde::{Deserialize, Serialize};

/// Clinical maturity classification of an egg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Maturity {
    MII,
    MI,
}

impl Maturity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Maturity::MII => "MII",
            Maturity::MI => "MI",
        }
    }
}

/// Detection box corners in natural image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One detected region within a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// `oocyte`, `cytoplasm`, `polarbody`, or `pb`.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Confidence in 0..=1.
    pub confidence: f64,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

/// Model output attached to a frame after inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResults {
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub inference_timestamp: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
}

/// Per-frame evaluation verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalResult {
    pub maturity: Maturity,
    /// `likely reproducible` or `unlikely reproducible`.
    pub quality: String,
    #[serde(default)]
    pub evaluated_at: Option<String>,
}

/// A frame document as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: String,
    #[serde(default)]
    pub frame_id: Option<String>,
    pub batch_id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(rename = "frameURL", default)]
    pub frame_url: String,
    /// Mirrors `evaluationResult.maturity`; the backend denormalizes it.
    #[serde(default)]
    pub maturity: Option<Maturity>,
    #[serde(default)]
    pub evaluation_result: Option<EvalResult>,
    #[serde(default)]
    pub detection_results: Option<DetectionResults>,
}

impl Frame {
    /// Maturity, preferring the denormalized field and falling back to the
    /// evaluation result.
    pub fn maturity(&self) -> Option<Maturity> {
        self.maturity
            .or_else(|| self.evaluation_result.as_ref().map(|r| r.maturity))
    }
}

/// Partial update for `PATCH /frames/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_result: Option<EvalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_results: Option<DetectionResults>,
}

/// Count evaluated frames by maturity. Frames without a verdict are
/// excluded from both counts.
pub fn count_by_maturity(frames: &[Frame]) -> (u32, u32) {
    let mut mii = 0;
    let mut mi = 0;
    for frame in frames {
        match frame.maturity() {
            Some(Maturity::MII) => mii += 1,
            Some(Maturity::MI) => mi += 1,
            None => {}
        }
    }
    (mii, mi)
}
