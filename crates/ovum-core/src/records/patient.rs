//! Patient records, medical history groups, and evaluation history.

use serde::{Deserialize, Serialize};

/// A patient document as returned by the backend.
///
/// Older documents can lack most fields, so everything past the identity
/// pair is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Date of birth as the backend serialized it.
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// `donor` or `recipient`.
    #[serde(default)]
    pub role: Option<String>,
    /// `active` or `inactive`.
    #[serde(default)]
    pub status: Option<String>,
    /// Journey stage: `registration`, `medicalHistory`, `appointment`,
    /// `retrieval`, or `eligibility`.
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub medical_history: Option<MedicalHistory>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Nested clinical intake data. All groups and all fields are optional;
/// the forms fill them incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_history: Option<PersonalHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatments: Option<Treatments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgeries: Option<Surgeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_history: Option<FamilyHistory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    /// `Never`, `Occasionally`, or `Often`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hormonal_therapy_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertility_treatments_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertility_treatment_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pelvic_surgery_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgery_detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetic_diseases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_fertility_issues: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for `PATCH /patients/{id}`. Unset fields are omitted
/// from the payload entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Paged patient listing from `GET /patients/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub items: Vec<Patient>,
}

/// Listing response in either shape the backend has emitted over time:
/// a paged envelope or a bare array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientList {
    Paged(PatientPage),
    Bare(Vec<Patient>),
}

impl PatientList {
    /// The patients regardless of envelope shape.
    pub fn into_items(self) -> Vec<Patient> {
        match self {
            PatientList::Paged(page) => page.items,
            PatientList::Bare(items) => items,
        }
    }

    pub fn total_items(&self) -> u64 {
        match self {
            PatientList::Paged(page) => page.total_items,
            PatientList::Bare(items) => items.len() as u64,
        }
    }
}

/// Approved evaluation history for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationHistory {
    pub patient_id: String,
    #[serde(default)]
    pub history: Vec<HistoryBatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBatch {
    pub batch_id: String,
    #[serde(default)]
    pub retrieval_date: Option<String>,
    #[serde(default)]
    pub mii_eggs: u32,
    #[serde(default)]
    pub mi_eggs: u32,
    #[serde(default)]
    pub suggested_eligibility: Option<String>,
    #[serde(default)]
    pub frames: Vec<HistoryFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFrame {
    pub id: String,
    #[serde(rename = "frameURL", default)]
    pub frame_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_list_accepts_both_shapes() {
        let paged = r#"{"page": 1, "limit": 20, "total_items": 2, "total_pages": 1,
                        "items": [{"id": "p1"}, {"id": "p2"}]}"#;
        let parsed: PatientList = serde_json::from_str(paged).unwrap();
        assert_eq!(parsed.total_items(), 2);
        assert_eq!(parsed.into_items().len(), 2);

        let bare = r#"[{"id": "p1"}]"#;
        let parsed: PatientList = serde_json::from_str(bare).unwrap();
        assert_eq!(parsed.total_items(), 1);
    }

    #[test]
    fn test_patient_update_omits_unset_fields() {
        let update = PatientUpdate {
            phone: Some("555-0101".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value.as_object().map(|o| o.len()), Some(1));
        assert_eq!(value["phone"], "555-0101");
    }

    #[test]
    fn test_history_frame_uses_uppercase_url_field() {
        let json = r#"{"patientId": "p1", "history": [{
            "batchId": "b1", "retrievalDate": "2025-03-01T00:00:00",
            "miiEggs": 5, "miEggs": 2, "suggestedEligibility": "eligible",
            "frames": [{"id": "f1", "frameURL": "storage/b1/f1.jpg"}]
        }]}"#;
        let parsed: EvaluationHistory = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.history[0].frames[0].frame_url, "storage/b1/f1.jpg");
        assert_eq!(parsed.history[0].mii_eggs, 5);
    }

    #[test]
    fn test_minimal_patient_document_parses() {
        let parsed: Patient = serde_json::from_str(r#"{"id": "p9"}"#).unwrap();
        assert_eq!(parsed.id, "p9");
        assert!(parsed.medical_history.is_none());
    }
}
