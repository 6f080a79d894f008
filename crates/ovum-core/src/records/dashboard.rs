//! Admin dashboard aggregates.

use serde::{Deserialize, Serialize};

/// One month of evaluation outcomes for the trend chart, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// `YYYY-MM`.
    pub month: String,
    pub likely_reproducible: u32,
    pub unlikely_reproducible: u32,
}

/// Patient counts per journey stage, split by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyStageCount {
    pub stage: String,
    pub donor: u32,
    pub recipient: u32,
}

/// Response from `GET /admin/dashboard` and `/admin/dashboard/overview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_patients: u64,
    pub total_batches: u64,
    pub today_appointments: u64,
    #[serde(default)]
    pub monthly_trend: Vec<MonthlyTrend>,
    #[serde(default)]
    pub journey_stages: Vec<JourneyStageCount>,
    #[serde(default)]
    pub patients_growth_percent: f64,
    #[serde(default)]
    pub last_batches_update_time: Option<String>,
    #[serde(default)]
    pub next_appointment_time: Option<String>,
    #[serde(default)]
    pub total_eggs: u64,
}
