pub mod bbox;
pub mod dispatch;
pub mod event;
pub mod node;
pub mod storage;
pub mod text;
pub mod transform;
pub mod tree;
