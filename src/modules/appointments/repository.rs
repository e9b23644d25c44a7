use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::modules::appointments::model::{
    Appointment, CreateAppointmentDto, UpdateAppointmentDto,
};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Appointment>, RepositoryError>;
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, RepositoryError>;
    async fn list_by_patient(&self, patient_id: i32) -> Result<Vec<Appointment>, RepositoryError>;
    async fn get(&self, id: i32) -> Result<Appointment, RepositoryError>;
    /// Books a visit on behalf of `user_id`. The visit date and the per-day
    /// sequence number are derived here.
    async fn create(
        &self,
        user_id: i32,
        patient_id: i32,
        dto: CreateAppointmentDto,
    ) -> Result<Appointment, RepositoryError>;
    async fn update(
        &self,
        id: i32,
        dto: UpdateAppointmentDto,
    ) -> Result<Appointment, RepositoryError>;
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

const APPOINTMENT_COLUMNS: &str = "id, patient_id, user_id, visit_date, appointment_sequence, \
     visit_timestamp, patient_notes, doctor_notes, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgAppointmentRepository {
    db: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Appointment>, RepositoryError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY visit_timestamp, id"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, RepositoryError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE visit_date = $1 \
             ORDER BY visit_timestamp, id"
        ))
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn list_by_patient(&self, patient_id: i32) -> Result<Vec<Appointment>, RepositoryError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE patient_id = $1 \
             ORDER BY visit_timestamp, id"
        ))
        .bind(patient_id)
        .fetch_all(&self.db)
        .await?;

        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<Appointment, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        user_id: i32,
        patient_id: i32,
        dto: CreateAppointmentDto,
    ) -> Result<Appointment, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments \
                (patient_id, user_id, visit_date, appointment_sequence, visit_timestamp, patient_notes) \
             SELECT $1, $2, $3, COALESCE(MAX(appointment_sequence), 0) + 1, $4, $5 \
             FROM appointments WHERE patient_id = $1 AND visit_date = $3 \
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(patient_id)
        .bind(user_id)
        .bind(dto.visit_date())
        .bind(dto.visit_time)
        .bind(&dto.patient_notes)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::from(e)
        })?;

        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: i32,
        dto: UpdateAppointmentDto,
    ) -> Result<Appointment, RepositoryError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments SET \
                patient_notes = COALESCE($2, patient_notes), \
                doctor_notes = COALESCE($3, doctor_notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.patient_notes)
        .bind(&dto.doctor_notes)
        .fetch_one(&self.db)
        .await?;

        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut selected: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .iter()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        selected.sort_by_key(|a| (a.visit_timestamp, a.id));
        selected
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn list(&self) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.select(|_| true).await)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.select(|a| a.visit_date == date).await)
    }

    async fn list_by_patient(&self, patient_id: i32) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.select(|a| a.patient_id == patient_id).await)
    }

    async fn get(&self, id: i32) -> Result<Appointment, RepositoryError> {
        self.appointments
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(
        &self,
        user_id: i32,
        patient_id: i32,
        dto: CreateAppointmentDto,
    ) -> Result<Appointment, RepositoryError> {
        let mut appointments = self.appointments.write().await;
        let visit_date = dto.visit_date();
        let sequence = appointments
            .iter()
            .filter(|a| a.patient_id == patient_id && a.visit_date == visit_date)
            .map(|a| a.appointment_sequence)
            .max()
            .unwrap_or(0)
            + 1;

        let now = Utc::now();
        let appointment = Appointment {
            id: appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1,
            patient_id,
            user_id: Some(user_id),
            visit_date,
            appointment_sequence: sequence,
            visit_timestamp: dto.visit_time,
            patient_notes: dto.patient_notes,
            doctor_notes: None,
            created_at: now,
            updated_at: now,
        };
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(
        &self,
        id: i32,
        dto: UpdateAppointmentDto,
    ) -> Result<Appointment, RepositoryError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;

        appointment.patient_notes = dto.patient_notes.or(appointment.patient_notes.take());
        appointment.doctor_notes = dto.doctor_notes.or(appointment.doctor_notes.take());
        appointment.updated_at = Utc::now();

        Ok(appointment.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| a.id != id);
        if appointments.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
