//! Role gating for routes that already run [`RequireAuth`].
//!
//! Roles are compared as exact, case-sensitive strings. There is no role
//! hierarchy: `doctor` does not imply `patient`.
//!
//! [`RequireAuth`]: crate::middleware::auth::RequireAuth

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower::Layer;
use tracing::{debug, error};

use carebook_core::AuthError;

use crate::middleware::auth::Identity;
use crate::routing::{Handler, Middleware};

/// Admits the request only if the identity's role is in the allowed set.
///
/// The set is fixed when the route is composed. An empty set denies
/// everyone.
#[derive(Debug, Clone)]
pub struct RequireRoles {
    allowed: Arc<[String]>,
}

impl RequireRoles {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            allowed: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, role: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == role)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Middleware for RequireRoles {
    fn wrap(&self, next: Handler) -> Handler {
        let layer = middleware::from_fn_with_state(self.clone(), require_roles);
        Handler::from_service(layer.layer(next))
    }
}

/// Checks `identity` against `allowed` without going through a request.
pub fn check_any_role(identity: &Identity, allowed: &RequireRoles) -> Result<(), AuthError> {
    if allowed.allows(identity.role()) {
        Ok(())
    } else {
        debug!(
            user_id = identity.user_id(),
            role = identity.role(),
            allowed = ?allowed.allowed(),
            "role not allowed"
        );
        Err(AuthError::RoleNotAllowed)
    }
}

async fn require_roles(State(allowed): State<RequireRoles>, req: Request, next: Next) -> Response {
    let identity = match Identity::from_request(&req) {
        Ok(identity) => identity,
        Err(err) => {
            error!(
                path = %req.uri().path(),
                "role check reached without an authenticated identity"
            );
            return err.into_response();
        }
    };

    match check_any_role(identity, &allowed) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::{User, roles};
    use chrono::Utc;

    fn identity_with_role(role: &str) -> Identity {
        let now = Utc::now();
        Identity(User {
            id: 3,
            email: "user@example.com".to_string(),
            password: String::new(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn test_role_in_set_allowed() {
        let gate = RequireRoles::new([roles::DOCTOR]);
        assert!(check_any_role(&identity_with_role("doctor"), &gate).is_ok());
    }

    #[test]
    fn test_role_outside_set_forbidden() {
        let gate = RequireRoles::new([roles::DOCTOR]);
        assert!(matches!(
            check_any_role(&identity_with_role("patient"), &gate),
            Err(AuthError::RoleNotAllowed)
        ));
    }

    #[test]
    fn test_role_comparison_is_case_sensitive() {
        let gate = RequireRoles::new([roles::DOCTOR]);
        assert!(!gate.allows("Doctor"));
        assert!(!gate.allows("DOCTOR"));
    }

    #[test]
    fn test_empty_set_denies_everyone() {
        let gate = RequireRoles::new(Vec::<String>::new());
        assert!(check_any_role(&identity_with_role("doctor"), &gate).is_err());
        assert!(check_any_role(&identity_with_role(""), &gate).is_err());
    }

    #[test]
    fn test_multiple_roles() {
        let gate = RequireRoles::new(["doctor", "nurse"]);
        assert!(gate.allows("nurse"));
        assert!(gate.allows("doctor"));
        assert!(!gate.allows("patient"));
    }
}
