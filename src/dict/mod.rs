pub mod interner;

pub use interner::Dictionary;
