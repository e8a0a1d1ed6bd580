//! Domain types shared across crates.

pub mod link;
