// Chronomarks shared type definitions
// Each submodule defines types used across the crate.

pub mod bookmark;
pub mod bucket;
pub mod errors;
pub mod organize;
