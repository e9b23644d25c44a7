//! # Carebook Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`server`]: listening port
//! - [`database`]: PostgreSQL connection settings
//!
//! Every loader falls back to a documented default so a bare `cargo run`
//! starts, but the defaults are for development only.
//!
//! # Example
//!
//! ```ignore
//! use carebook_config::{DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! let database_config = DatabaseConfig::from_env();
//! ```

pub mod database;
pub mod jwt;
pub mod server;

pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
