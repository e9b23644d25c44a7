use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// An account that can log in. `role` is free-form text compared verbatim by
/// the role gate (`"doctor"`, `"patient"`, ...).
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub mod roles {
    pub const DOCTOR: &str = "doctor";
    pub const PATIENT: &str = "patient";
}
