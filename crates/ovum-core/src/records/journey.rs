//! Journey records: a patient's progress through the clinic stages.

use serde::{Deserialize, Serialize};

/// Per-stage completion markers. Values are `pending`, `active`, `done`,
/// or `failed` depending on the stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStages {
    pub registration: String,
    pub medical_history: String,
    pub appointment: String,
    pub retrieval: String,
    pub eligibility: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyAppointment {
    pub id: String,
    pub appointment_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default)]
    pub staff_assigned: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyBatch {
    pub id: String,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyEggRecord {
    pub id: String,
    pub mii_eggs: u32,
    pub mi_eggs: u32,
    pub total: u32,
    pub created_at: String,
}

/// Response from `GET /journey/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub patient_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// `donor` or `recipient`.
    pub role: String,
    pub stage: JourneyStages,
    #[serde(default)]
    pub appointments: Vec<JourneyAppointment>,
    #[serde(default)]
    pub batches: Vec<JourneyBatch>,
    #[serde(default)]
    pub egg_records: Vec<JourneyEggRecord>,
    #[serde(default)]
    pub eligibility_score: Option<f64>,
    #[serde(default)]
    pub eligibility_rule: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journey_parses() {
        let json = r#"{"patientId": "p1", "fullName": "Pat Example", "role": "donor",
                       "stage": {"registration": "done", "medicalHistory": "done",
                                 "appointment": "done", "retrieval": "active",
                                 "eligibility": "pending"},
                       "appointments": [], "batches": [], "eggRecords": [],
                       "eligibilityScore": 72.5, "eligibilityRule": "MII >= 70%"}"#;
        let parsed: Journey = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.stage.retrieval, "active");
        assert_eq!(parsed.eligibility_score, Some(72.5));
    }
}
