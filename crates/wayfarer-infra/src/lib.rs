//! # Wayfarer Infrastructure
//!
//! Concrete implementations of the ports defined in `wayfarer-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post storage via SeaORM
//! - `auth` - JWT identity provider

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{DatabaseConnections, InMemoryPostRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
