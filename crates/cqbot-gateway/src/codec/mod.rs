//! Message wire codecs: CQ inline markup and JSON segment lists

pub mod cq_code;
pub mod segments;

pub use segments::{decode_segments, encode_segments, RawSegment};
