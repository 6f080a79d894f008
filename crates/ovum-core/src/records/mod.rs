//! Wire records exchanged with the clinic backend.
//!
//! Every entity here is owned by the backend; the client holds transient
//! copies that are revalidated on each fetch. Field names follow the JSON
//! the API emits (camelCase, with a handful of legacy snake_case fields
//! kept under explicit renames). Timestamps stay as strings because the
//! backend serializes Firestore datetimes in more than one shape.

pub mod appointment;
pub mod auth;
pub mod batch;
pub mod dashboard;
pub mod egg_record;
pub mod evaluation;
pub mod frame;
pub mod journey;
pub mod patient;
pub mod staff;

pub use appointment::{
    Appointment, AppointmentCreate, AppointmentPage, AppointmentQuery, AppointmentUpdate,
    AppointmentUpdateResult, APPOINTMENT_KINDS,
};
pub use auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterPatientRequest, StatusResponse,
};
pub use batch::{
    suggest_eligibility, ApproveEligibilityRequest, Batch, BatchCreate, BatchResultSummary,
    BatchUpdate, EligibilitySuggestion,
};
pub use dashboard::{DashboardOverview, JourneyStageCount, MonthlyTrend};
pub use egg_record::{EggRecord, EggRecordCreate, EggRecordUpdate};
pub use evaluation::{
    EvaluationPhase, EvaluationStatus, FrameProgress, ReportSummary, StartEvaluationResponse,
};
pub use frame::{BoundingBox, Detection, DetectionResults, EvalResult, Frame, FrameUpdate, Maturity};
pub use journey::{Journey, JourneyAppointment, JourneyBatch, JourneyEggRecord, JourneyStages};
pub use patient::{
    EvaluationHistory, HistoryBatch, HistoryFrame, MedicalHistory, Patient, PatientList,
    PatientPage, PatientUpdate,
};
pub use staff::{MessageResponse, Staff, StaffCreate, StaffUpdate};
