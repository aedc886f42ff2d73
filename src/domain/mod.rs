//! Domain layer types and invariants.

pub mod ang;
pub mod error;
pub mod lines;
