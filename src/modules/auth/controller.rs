use axum::{Json, extract::State};
use tracing::instrument;

use carebook_core::AppError;

use crate::middleware::auth::Identity;
use crate::modules::auth::model::{LoginRequest, LoginResponse, MessageResponse};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[instrument(skip(state))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.users.as_ref(), &state.tokens, dto).await?;
    Ok(Json(response))
}

/// Acknowledges the logout. Tokens stay valid until they expire; there is
/// no revocation list yet.
#[instrument(skip(identity), fields(user_id = identity.user_id()))]
pub async fn logout_user(identity: Identity) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logout successful".to_string(),
    })
}
