pub mod accessor;
pub mod animator;
pub mod builder;
pub mod ease;
pub mod value;
