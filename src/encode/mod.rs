pub mod chunk;
pub mod encoder;

pub use encoder::{EncodeStats, ParallelEncoder};
