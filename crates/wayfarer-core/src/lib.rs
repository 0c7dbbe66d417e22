//! # Wayfarer Core
//!
//! The domain layer of the Wayfarer blog API: posts, listing queries and the
//! post service. Pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::PostService;
