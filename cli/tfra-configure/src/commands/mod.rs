//! CLI command implementations.

pub mod clean;
pub mod configure;
pub mod doctor;
