//! # Carebook Core
//!
//! Core types shared by every Carebook crate:
//!
//! - [`errors`]: [`AppError`] for business handlers and [`AuthError`] for the
//!   authentication/authorization layer, both convertible into HTTP responses
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use carebook_core::{AppError, AuthError, hash_password};
//!
//! let err = AppError::not_found(anyhow::anyhow!("Patient not found"));
//! let denied = AuthError::RoleNotAllowed; // 403 "Forbidden"
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, AuthError};
pub use password::{hash_password, verify_password};
