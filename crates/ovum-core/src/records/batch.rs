//! Retrieval batch records and the eligibility suggestion rule.

use serde::{Deserialize, Serialize};

/// Aggregated evaluation counts carried on a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultSummary {
    #[serde(default)]
    pub total_frames: u32,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub mii: Option<u32>,
    #[serde(default)]
    pub mi: Option<u32>,
    #[serde(rename = "evaluationReportURL", default)]
    pub evaluation_report_url: Option<String>,
}

/// A retrieval batch as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    /// `donor` or `recipient`.
    #[serde(default)]
    pub patient_role: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// `pending`, `processing`, `completed`, or `failed`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result_summary: BatchResultSummary,
    #[serde(default)]
    pub eligibility_percentage: Option<f64>,
    /// `eligible` or `notEligible`.
    #[serde(default)]
    pub suggested_eligibility: Option<String>,
    /// `pending`, `approved`, or `rejected`.
    #[serde(default)]
    pub eligibility_status: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
}

/// Payload for `POST /batches/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreate {
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for `PATCH /batches/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<BatchResultSummary>,
    #[serde(rename = "evaluationReportURL", skip_serializing_if = "Option::is_none")]
    pub evaluation_report_url: Option<String>,
}

/// Payload for `POST /batches/{id}/approve-eligibility`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveEligibilityRequest {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of the eligibility suggestion rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilitySuggestion {
    /// Percentage of frames meeting the role's maturity criterion, 0 to 100.
    pub percentage: f64,
    pub eligible: bool,
}

impl EligibilitySuggestion {
    /// Wire value: `eligible` or `notEligible`.
    pub fn as_str(&self) -> &'static str {
        if self.eligible {
            "eligible"
        } else {
            "notEligible"
        }
    }
}

/// Suggest eligibility from evaluated frame counts.
///
/// Donors qualify when at least 70% of frames are MII; recipients when at
/// least 90% are MI. Returns `None` until at least one frame has an
/// evaluation result, or when the role is unknown.
pub fn suggest_eligibility(
    patient_role: &str,
    total_frames: u32,
    mii_count: u32,
    mi_count: u32,
) -> Option<EligibilitySuggestion> {
    if total_frames == 0 || (mii_count == 0 && mi_count == 0) {
        return None;
    }

    let (numerator, threshold) = match patient_role {
        "donor" => (mii_count, 70.0),
        "recipient" => (mi_count, 90.0),
        _ => return None,
    };

    let percentage = (numerator as f64 / total_frames as f64) * 100.0;
    Some(EligibilitySuggestion {
        percentage,
        eligible: percentage >= threshold,
    })
}
