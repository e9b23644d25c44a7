use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A visit booked for a patient.
///
/// `appointment_sequence` numbers the visits of one patient on one day,
/// starting at 1.
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: i32,
    pub patient_id: i32,
    /// Account that booked the visit.
    pub user_id: Option<i32>,
    pub visit_date: NaiveDate,
    pub appointment_sequence: i16,
    #[serde(rename = "visit_time")]
    pub visit_timestamp: DateTime<Utc>,
    pub patient_notes: Option<String>,
    pub doctor_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateAppointmentDto {
    pub visit_time: DateTime<Utc>,
    #[validate(length(max = 1000, message = "patient_notes must be at most 1000 characters"))]
    pub patient_notes: Option<String>,
}

impl CreateAppointmentDto {
    pub fn visit_date(&self) -> NaiveDate {
        self.visit_time.date_naive()
    }
}

/// Notes update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateAppointmentDto {
    #[validate(length(max = 1000, message = "patient_notes must be at most 1000 characters"))]
    pub patient_notes: Option<String>,
    #[validate(length(max = 1000, message = "doctor_notes must be at most 1000 characters"))]
    pub doctor_notes: Option<String>,
}

/// Parses the `{date}` segment of `/api/appointments/date/{date}`.
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
