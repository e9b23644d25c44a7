use anyhow::anyhow;
use tracing::{info, instrument, warn};

use carebook_auth::TokenCodec;
use carebook_core::{AppError, verify_password};

use crate::db::{RepositoryError, bounded};
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::users::repository::UserRepository;

pub struct AuthService;

impl AuthService {
    /// Exchanges email and password for a signed token.
    ///
    /// An unknown email and a wrong password produce the same 401 so callers
    /// cannot probe which accounts exist.
    #[instrument(skip(users, tokens))]
    pub async fn login(
        users: &dyn UserRepository,
        tokens: &TokenCodec,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::unauthorized(anyhow!("Invalid credentials"));

        let user = match bounded(users.get_by_email(&dto.email)).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => return Err(invalid()),
            Err(RepositoryError::Backend(err)) => {
                warn!(error = %err, "user lookup failed during login");
                return Err(invalid());
            }
        };

        if !verify_password(&dto.password, &user.password)? {
            return Err(invalid());
        }

        let token = tokens.issue(user.id).map_err(AppError::auth)?;
        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse { token })
    }
}
