//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod evaluation;
pub mod price;
pub mod returns;
pub mod statistics;
pub mod weights;
