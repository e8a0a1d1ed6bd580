//! Trait seams implemented by the outer crates.

pub mod storage;
pub mod store;
