#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;

use carebook::carebook_auth::TokenCodec;
use carebook::carebook_core::hash_password;
use carebook::db::RepositoryError;
use carebook::modules::appointments::repository::InMemoryAppointmentRepository;
use carebook::modules::patients::repository::InMemoryPatientRepository;
use carebook::modules::users::model::{User, roles};
use carebook::modules::users::repository::{InMemoryUserRepository, UserRepository};
use carebook::router::init_router;
use carebook::state::AppState;

pub const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-characters-long";
pub const DOCTOR_PASSWORD: &str = "doctor-pass-123";
pub const PATIENT_PASSWORD: &str = "patient-pass-123";

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET, Duration::hours(24))
}

pub struct TestApp {
    pub state: AppState,
    pub doctor: User,
    pub patient: User,
}

impl TestApp {
    pub fn router(&self) -> Router {
        init_router(self.state.clone()).unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(user.id).unwrap()
    }

    pub fn doctor_token(&self) -> String {
        self.token_for(&self.doctor)
    }

    pub fn patient_token(&self) -> String {
        self.token_for(&self.patient)
    }
}

/// In-memory state with one doctor and one patient account.
pub async fn setup_test_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let doctor = users
        .insert(
            "doctor@clinic.test",
            &hash_password(DOCTOR_PASSWORD).unwrap(),
            roles::DOCTOR,
        )
        .await;
    let patient = users
        .insert(
            "patient@clinic.test",
            &hash_password(PATIENT_PASSWORD).unwrap(),
            roles::PATIENT,
        )
        .await;

    let state = AppState::new(
        users,
        Arc::new(InMemoryPatientRepository::new()),
        Arc::new(InMemoryAppointmentRepository::new()),
        test_codec(),
    );

    TestApp {
        state,
        doctor,
        patient,
    }
}

/// Same as [`setup_test_app`] but every user lookup fails with a backend
/// error.
pub fn setup_app_with_failing_users() -> AppState {
    AppState::new(
        Arc::new(FailingUserRepository),
        Arc::new(InMemoryPatientRepository::new()),
        Arc::new(InMemoryAppointmentRepository::new()),
        test_codec(),
    )
}

pub struct FailingUserRepository;

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn get_by_id(&self, _id: i32) -> Result<User, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }

    async fn get_by_email(&self, _email: &str) -> Result<User, RepositoryError> {
        Err(RepositoryError::Backend("connection refused".to_string()))
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
