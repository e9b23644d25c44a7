//! Application error types.
//!
//! Two families of errors cross the HTTP boundary:
//!
//! - [`AppError`]: raised by business handlers; rendered as JSON
//!   `{"error": "<message>"}` with the carried status code.
//! - [`AuthError`]: raised by the authentication and authorization
//!   middleware; rendered as a plain-text body. These terminate the request
//!   at the middleware that detected them and never reach a business handler.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    /// Keeps the status an [`AuthError`] maps to; the blanket `From` would
    /// turn it into a 500.
    pub fn auth(err: AuthError) -> Self {
        Self::new(err.status(), err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Failures produced by the token codec and the auth middleware chain.
///
/// The `Display` text of each variant is exactly the response body sent to
/// the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or a scheme other than `Bearer`.
    #[error("Unauthorized")]
    MissingToken,
    /// Bad signature, malformed token, or expired.
    #[error("Invalid or expired token")]
    InvalidToken,
    /// The token subject could not be resolved. Covers both "no such user"
    /// and an unavailable lookup backend.
    #[error("User not found")]
    IdentityLookupFailed,
    #[error("Forbidden")]
    RoleNotAllowed,
    /// Authorization ran without a preceding authentication step.
    #[error("Unauthorized")]
    MisconfiguredChain,
    /// Signing a new token failed. Carries the signer's message for logs.
    #[error("Could not generate token")]
    TokenSigning(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::IdentityLookupFailed
            | AuthError::MisconfiguredChain => StatusCode::UNAUTHORIZED,
            AuthError::RoleNotAllowed => StatusCode::FORBIDDEN,
            AuthError::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
