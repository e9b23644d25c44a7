//! # Carebook Auth
//!
//! Identity tokens for the Carebook API.
//!
//! - [`claims`]: the claim set embedded in every token
//! - [`codec`]: [`TokenCodec`], which issues and verifies HS256 tokens with a
//!   secret injected at construction
//!
//! # Example
//!
//! ```ignore
//! use carebook_auth::TokenCodec;
//! use carebook_config::JwtConfig;
//!
//! let codec = TokenCodec::from_config(&JwtConfig::from_env());
//! let token = codec.issue(42)?;
//! assert_eq!(codec.verify(&token)?, 42);
//! ```

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::TokenCodec;
