//! # sharedrop-database
//!
//! PostgreSQL connection management, migrations, and the concrete
//! [`LinkStore`](sharedrop_core::traits::store::LinkStore) implementation.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use repositories::link::LinkRepository;
