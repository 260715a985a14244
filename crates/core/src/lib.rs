//! Core business logic for institute-rs.

pub mod services;

pub use services::*;
