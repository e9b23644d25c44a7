use serde::{Deserialize, Serialize};

/// Claim set carried by an identity token.
///
/// Only the subject and the validity window are embedded; role and email are
/// looked up on every request so a role change takes effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    pub user_id: i32,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}
