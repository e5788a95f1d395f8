//! Assignment workflow: what happens to a cluster once an administrator
//! acknowledges it.
//!
//! Records are plain values; storing them and applying the returned
//! [`StatusChange`]s to reports is left to the caller.

pub mod assignment;
pub mod types;

pub use assignment::ClusterAssignment;
pub use types::*;
