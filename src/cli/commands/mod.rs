//! Command execution functions.

pub mod build;
pub mod bundle;
