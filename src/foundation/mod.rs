pub mod core;
pub mod error;
pub mod lru;
pub mod math;
