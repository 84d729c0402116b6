//! Message model - segments and the chains they compose

mod chain;
mod segment;

pub use chain::MessageChain;
pub use segment::{MessageSegment, REPLY, TEXT};
