//! Bearer-token authentication.
//!
//! [`RequireAuth`] admits a request only when it carries a valid token whose
//! subject resolves to a stored user. The resolved [`Identity`] is inserted
//! into the request extensions for everything downstream.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower::Layer;
use tracing::{debug, warn};

use carebook_auth::TokenCodec;
use carebook_core::AuthError;

use crate::db::RepositoryError;
use crate::modules::users::model::User;
use crate::modules::users::repository::UserRepository;
use crate::routing::{Handler, Middleware};

/// The authenticated user for the current request.
///
/// Present in the request extensions only after [`RequireAuth`] has run.
/// Also usable as an extractor in handlers behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub User);

impl Identity {
    pub fn user_id(&self) -> i32 {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }

    pub fn user(&self) -> &User {
        &self.0
    }

    /// Reads the identity attached by [`RequireAuth`].
    ///
    /// # Errors
    ///
    /// [`AuthError::MisconfiguredChain`] when no authentication ran before.
    pub fn from_request(req: &Request) -> Result<&Identity, AuthError> {
        req.extensions()
            .get::<Identity>()
            .ok_or(AuthError::MisconfiguredChain)
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MisconfiguredChain)
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
///
/// The scheme match is exact and case-sensitive. An empty token counts as
/// absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Turns request headers into an [`Identity`].
#[derive(Clone)]
pub struct IdentityResolver {
    codec: TokenCodec,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(codec: TokenCodec, users: Arc<dyn UserRepository>) -> Self {
        Self { codec, users }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        let user_id = self.codec.verify(token)?;

        match self.users.get_by_id(user_id).await {
            Ok(user) => Ok(Identity(user)),
            Err(RepositoryError::NotFound) => {
                debug!(user_id, "token subject no longer exists");
                Err(AuthError::IdentityLookupFailed)
            }
            Err(RepositoryError::Backend(err)) => {
                warn!(user_id, error = %err, "identity lookup failed");
                Err(AuthError::IdentityLookupFailed)
            }
        }
    }
}

/// Middleware admitting only authenticated requests.
#[derive(Clone)]
pub struct RequireAuth {
    resolver: IdentityResolver,
}

impl RequireAuth {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }
}

impl Middleware for RequireAuth {
    fn wrap(&self, next: Handler) -> Handler {
        let layer = middleware::from_fn_with_state(self.resolver.clone(), authenticate);
        Handler::from_service(layer.layer(next))
    }
}

async fn authenticate(
    State(resolver): State<IdentityResolver>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolver.resolve(req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
