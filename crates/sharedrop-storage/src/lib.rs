//! # sharedrop-storage
//!
//! Byte storage backends for ShareDrop. The
//! [`StorageProvider`](sharedrop_core::traits::storage::StorageProvider)
//! trait lives in `sharedrop-core`; this crate holds the local
//! filesystem implementation.

pub mod local;

pub use local::LocalStorageProvider;
