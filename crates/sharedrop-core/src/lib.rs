//! # sharedrop-core
//!
//! Core crate for ShareDrop. Contains the trait seams (link store,
//! storage provider), configuration schemas, the link record domain
//! type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ShareDrop crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
