//! Authentication and authorization middleware.
//!
//! - [`auth`]: [`RequireAuth`](auth::RequireAuth) verifies the bearer token,
//!   loads the user and attaches an [`Identity`](auth::Identity)
//! - [`role`]: [`RequireRoles`](role::RequireRoles) admits only listed roles
//!
//! Both implement [`Middleware`](crate::routing::Middleware) and are declared
//! per route, authentication first:
//!
//! ```ignore
//! Route::new(Method::PUT, "/api/appointments/{id}")
//!     .handler(handler)
//!     .middleware(RequireAuth::new(resolver))
//!     .middleware(RequireRoles::new([roles::DOCTOR]))
//!     .register(&mut table)?;
//! ```
//!
//! Failures answer with a plain-text body: 401 `Unauthorized`, 401
//! `Invalid or expired token`, 401 `User not found` or 403 `Forbidden`.

pub mod auth;
pub mod role;
