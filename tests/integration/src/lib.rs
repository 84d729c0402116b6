//! Integration test utilities for the bot
//!
//! This crate provides a local WebSocket gateway and frame fixtures for
//! running the bot end to end.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
