//! Tasknest Core crate - shared configuration, error type, domain types,
//! request validation and password hashing.

pub mod config;
pub mod error;
pub mod password;
pub mod types;
pub mod validation;

pub use config::TasknestConfig;
pub use error::{Result, TasknestError};
pub use password::PasswordHasher;
pub use types::*;
pub use validation::{FieldRule, FieldViolation, Schema, ValidationErrors};
