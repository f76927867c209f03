pub mod hit;
pub mod proxy;
pub mod shape;
pub mod sink;
pub mod svg;
