//! Patient records and the payloads that create, update and list them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Serialize, FromRow, Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub age: Option<i16>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(ValidationError::new("gender")
            .with_message("gender must be one of Male, Female, Other".into()))
    }
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreatePatientDto {
    #[validate(length(min = 1, max = 255, message = "name is required and must be at most 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "phone is required and must be at most 20 characters"))]
    pub phone: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: Option<i16>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    pub weight: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    pub height: Option<f64>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdatePatientDto {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: Option<i16>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    pub weight: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    pub height: Option<f64>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatientSortField {
    #[default]
    Id,
    Name,
    Age,
    CreatedAt,
}

impl PatientSortField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Age => "age",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query parameters for `GET /api/patients`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PatientFilterParams {
    /// Case-insensitive substring match on the name.
    pub name: Option<String>,
    #[serde(default)]
    pub sort_by: PatientSortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
}
