use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::db::RepositoryError;
use crate::modules::patients::model::{
    CreatePatientDto, Patient, PatientFilterParams, PatientSortField, SortDirection,
    UpdatePatientDto,
};

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn list(&self, filter: &PatientFilterParams) -> Result<Vec<Patient>, RepositoryError>;
    async fn get(&self, id: i32) -> Result<Patient, RepositoryError>;
    async fn create(&self, dto: CreatePatientDto) -> Result<Patient, RepositoryError>;
    async fn update(&self, id: i32, dto: UpdatePatientDto) -> Result<Patient, RepositoryError>;
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

const PATIENT_COLUMNS: &str =
    "id, name, phone, email, age, weight, height, gender, address, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgPatientRepository {
    db: PgPool,
}

impl PgPatientRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: &PatientFilterParams) -> Result<Vec<Patient>, RepositoryError> {
        // Sort column and direction come from closed enums, never from raw input.
        let query = format!(
            "SELECT {PATIENT_COLUMNS} FROM patients \
             WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%') \
             ORDER BY {} {}, id ASC",
            filter.sort_by.column(),
            filter.sort_direction.keyword(),
        );

        let patients = sqlx::query_as::<_, Patient>(&query)
            .bind(filter.name.as_deref())
            .fetch_all(&self.db)
            .await?;

        Ok(patients)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<Patient, RepositoryError> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(patient)
    }

    #[instrument(skip(self))]
    async fn create(&self, dto: CreatePatientDto) -> Result<Patient, RepositoryError> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "INSERT INTO patients (name, phone, email, age, weight, height, gender, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PATIENT_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(dto.age)
        .bind(dto.weight)
        .bind(dto.height)
        .bind(&dto.gender)
        .bind(&dto.address)
        .fetch_one(&self.db)
        .await?;

        Ok(patient)
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i32, dto: UpdatePatientDto) -> Result<Patient, RepositoryError> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "UPDATE patients SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                email = COALESCE($4, email), \
                age = COALESCE($5, age), \
                weight = COALESCE($6, weight), \
                height = COALESCE($7, height), \
                gender = COALESCE($8, gender), \
                address = COALESCE($9, address), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PATIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(dto.age)
        .bind(dto.weight)
        .bind(dto.height)
        .bind(&dto.gender)
        .bind(&dto.address)
        .fetch_one(&self.db)
        .await?;

        Ok(patient)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
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
pub struct InMemoryPatientRepository {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Patient, b: &Patient, field: PatientSortField) -> Ordering {
    let primary = match field {
        PatientSortField::Id => a.id.cmp(&b.id),
        PatientSortField::Name => a.name.cmp(&b.name),
        PatientSortField::Age => a.age.cmp(&b.age),
        PatientSortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn list(&self, filter: &PatientFilterParams) -> Result<Vec<Patient>, RepositoryError> {
        let needle = filter.name.as_deref().map(str::to_lowercase);
        let mut patients: Vec<Patient> = self
            .patients
            .read()
            .await
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|needle| p.name.to_lowercase().contains(needle))
            })
            .cloned()
            .collect();

        patients.sort_by(|a, b| match filter.sort_direction {
            SortDirection::Asc => compare(a, b, filter.sort_by),
            SortDirection::Desc => compare(b, a, filter.sort_by),
        });
        Ok(patients)
    }

    async fn get(&self, id: i32) -> Result<Patient, RepositoryError> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, dto: CreatePatientDto) -> Result<Patient, RepositoryError> {
        let mut patients = self.patients.write().await;
        let now = Utc::now();
        let patient = Patient {
            id: patients.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            name: dto.name,
            phone: Some(dto.phone),
            email: dto.email,
            age: dto.age,
            weight: dto.weight,
            height: dto.height,
            gender: Some(dto.gender),
            address: dto.address,
            created_at: now,
            updated_at: now,
        };
        patients.push(patient.clone());
        Ok(patient)
    }

    async fn update(&self, id: i32, dto: UpdatePatientDto) -> Result<Patient, RepositoryError> {
        let mut patients = self.patients.write().await;
        let patient = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = dto.name {
            patient.name = name;
        }
        if let Some(email) = dto.email {
            patient.email = email;
        }
        patient.phone = dto.phone.or(patient.phone.take());
        patient.age = dto.age.or(patient.age);
        patient.weight = dto.weight.or(patient.weight);
        patient.height = dto.height.or(patient.height);
        patient.gender = dto.gender.or(patient.gender.take());
        patient.address = dto.address.or(patient.address.take());
        patient.updated_at = Utc::now();

        Ok(patient.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut patients = self.patients.write().await;
        let before = patients.len();
        patients.retain(|p| p.id != id);
        if patients.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str, age: i16) -> CreatePatientDto {
        CreatePatientDto {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            age: Some(age),
            weight: None,
            height: None,
            gender: "Other".to_string(),
            address: None,
        }
    }

    async fn seeded() -> InMemoryPatientRepository {
        let repo = InMemoryPatientRepository::new();
        for (name, age) in [("Carol", 50), ("alice", 30), ("Bob", 40)] {
            repo.create(dto(name, age)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_list_filters_case_insensitive() {
        let repo = seeded().await;
        let filter = PatientFilterParams {
            name: Some("ALI".to_string()),
            ..Default::default()
        };

        let names: Vec<String> = repo.list(&filter).await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_list_sorts() {
        let repo = seeded().await;
        let filter = PatientFilterParams {
            name: None,
            sort_by: PatientSortField::Age,
            sort_direction: SortDirection::Desc,
        };

        let ages: Vec<Option<i16>> = repo.list(&filter).await.unwrap().iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![Some(50), Some(40), Some(30)]);

        let ids: Vec<i32> = repo
            .list(&PatientFilterParams::default())
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let repo = seeded().await;
        let updated = repo
            .update(
                2,
                UpdatePatientDto {
                    age: Some(31),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, Some(31));
        assert_eq!(updated.name, "alice");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let repo = seeded().await;
        assert_eq!(repo.delete(2).await, Ok(()));
        assert_eq!(repo.delete(2).await, Err(RepositoryError::NotFound));
        assert_eq!(repo.get(2).await, Err(RepositoryError::NotFound));
    }
}
