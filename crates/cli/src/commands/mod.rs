//! Subcommand implementations.

pub mod advice;
pub mod inventory;
