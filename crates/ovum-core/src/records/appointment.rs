//! Appointment records and the listing query builder.

use serde::{Deserialize, Serialize};

/// Appointment types the backend accepts.
pub const APPOINTMENT_KINDS: [&str; 2] = ["checkup", "retrieval"];

/// An appointment as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub appointment_date: String,
    /// `checkup` or `retrieval`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `pending`, `confirmed`, `cancelled`, or `completed`.
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub staff_assigned: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Payload for `POST /appointments/` (patients book for themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreate {
    pub appointment_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
}

/// Partial update for `PATCH /appointments/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_assigned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Acknowledgement for `PATCH /appointments/{id}`: the id plus an echo of
/// the fields the server applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentUpdateResult {
    pub id: String,
    #[serde(default)]
    pub updated: serde_json::Value,
}

/// Cursor-paged listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPage {
    #[serde(default)]
    pub items: Vec<Appointment>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Filters for `GET /appointments/` and `GET /appointments/my`.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub patient_id: Option<String>,
}

impl AppointmentQuery {
    /// Render the query string, without a leading `?`. Empty when no
    /// filter is set.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(kind) = &self.kind {
            pairs.push(("type", kind.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(from) = &self.date_from {
            pairs.push(("dateFrom", from.clone()));
        }
        if let Some(to) = &self.date_to {
            pairs.push(("dateTo", to.clone()));
        }
        if let Some(patient_id) = &self.patient_id {
            pairs.push(("patientId", patient_id.clone()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty_when_unfiltered() {
        assert_eq!(AppointmentQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = AppointmentQuery {
            limit: Some(10),
            kind: Some("checkup".to_string()),
            date_from: Some("2025-03-01T00:00:00+07:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string(),
            "limit=10&type=checkup&dateFrom=2025-03-01T00%3A00%3A00%2B07%3A00"
        );
    }

    #[test]
    fn test_type_field_round_trip() {
        let json = r#"{"id": "a1", "patientId": "p1",
                       "appointmentDate": "2025-03-10 09:00",
                       "type": "retrieval", "status": "pending",
                       "notes": null, "staffAssigned": null,
                       "createdAt": "2025-03-01T00:00:00"}"#;
        let parsed: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, "retrieval");
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["type"], "retrieval");
    }
}
