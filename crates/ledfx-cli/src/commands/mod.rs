//! CLI command implementations.

pub mod check;
pub mod defaults;
pub mod effects;
pub mod migrate;
pub mod save;
