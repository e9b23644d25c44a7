use std::sync::Arc;

use sqlx::PgPool;

use carebook_auth::TokenCodec;
use carebook_config::JwtConfig;

use crate::middleware::auth::IdentityResolver;
use crate::modules::appointments::repository::{AppointmentRepository, PgAppointmentRepository};
use crate::modules::patients::repository::{PatientRepository, PgPatientRepository};
use crate::modules::users::repository::{PgUserRepository, UserRepository};

/// Shared handles for handlers and middleware. Everything inside is either
/// immutable after startup or synchronizes internally.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub patients: Arc<dyn PatientRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            users,
            patients,
            appointments,
            tokens,
        }
    }

    pub fn identity_resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.tokens.clone(), self.users.clone())
    }
}

pub fn init_app_state(db: PgPool, jwt_config: &JwtConfig) -> AppState {
    AppState::new(
        Arc::new(PgUserRepository::new(db.clone())),
        Arc::new(PgPatientRepository::new(db.clone())),
        Arc::new(PgAppointmentRepository::new(db)),
        TokenCodec::from_config(jwt_config),
    )
}
