//! Evaluation job records: start acknowledgements and status snapshots.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of an evaluation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPhase {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EvaluationPhase {
    /// Terminal phases end the poll loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EvaluationPhase::Completed | EvaluationPhase::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationPhase::Pending => "pending",
            EvaluationPhase::Processing => "processing",
            EvaluationPhase::Completed => "completed",
            EvaluationPhase::Failed => "failed",
        }
    }
}

/// Acknowledgement from `POST /evaluation/batch/{id}/start` and
/// `/re-evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEvaluationResponse {
    pub evaluation_request_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    /// `started` or `re-evaluation_started`.
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Per-frame progress entry inside a status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProgress {
    pub frame_id: String,
    #[serde(rename = "frameURL", default)]
    pub frame_url: String,
    pub status: String,
}

/// Aggregated counts reported once a job finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: u32,
    pub mii: u32,
    pub mi: u32,
    #[serde(rename = "reportFileURL", default)]
    pub report_file_url: Option<String>,
}

/// Status snapshot from `GET /evaluation/batch/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStatus {
    pub id: String,
    pub batch_id: String,
    #[serde(default)]
    pub initiated_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub status: EvaluationPhase,
    #[serde(default)]
    pub frame_list: Option<Vec<FrameProgress>>,
    #[serde(default)]
    pub error_log: Option<String>,
    #[serde(default)]
    pub report_summary: Option<ReportSummary>,
    #[serde(default)]
    pub total_frames: u32,
    #[serde(default)]
    pub completed_frames: u32,
    #[serde(default)]
    pub failed_frames: u32,
    /// Processed fraction in 0..=1.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub batch_status: Option<String>,
}

impl EvaluationStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
