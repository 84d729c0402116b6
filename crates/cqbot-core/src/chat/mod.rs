//! Chat targets - users and groups

mod target;

pub use target::{ChatError, ChatTarget, Group, User};
