//! Semantic analysis for the Mano front end.

pub mod analyze;
pub mod symbol;
