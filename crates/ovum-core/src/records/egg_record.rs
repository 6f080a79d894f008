//! Egg record documents: final per-batch counts behind the history views.

use serde::{Deserialize, Serialize};

/// An egg record as returned by `GET /egg-records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggRecord {
    pub id: String,
    pub patient_id: String,
    pub batch_id: String,
    #[serde(default)]
    pub mii_eggs: u32,
    #[serde(default)]
    pub mi_eggs: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub suggested_eligibility: Option<String>,
    #[serde(default)]
    pub eligibility_status: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for `POST /egg-records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggRecordCreate {
    pub patient_id: String,
    pub batch_id: String,
    pub mii_eggs: u32,
    pub mi_eggs: u32,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_eligibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_status: Option<String>,
}

/// Partial update for `PATCH /egg-records/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mii_eggs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mi_eggs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_eligibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}
