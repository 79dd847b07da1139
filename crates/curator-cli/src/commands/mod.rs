//! CLI command implementations.

pub mod check;
pub mod curate;
pub mod tool;
pub mod validate;
