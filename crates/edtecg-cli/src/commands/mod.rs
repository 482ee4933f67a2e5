//! Subcommand implementations.

pub mod auth;
pub mod files;
pub mod flashcards;
pub mod mocks;
