//! # Fabula Core
//!
//! The domain layer of the Fabula blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the entity model, the visibility and ownership rules, and the repository
//! ports that storage adapters implement.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::DomainError;
