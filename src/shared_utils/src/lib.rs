//! Small helpers shared by the workspace crates: environment lookups with
//! typed errors.

pub mod config;
pub mod env;
