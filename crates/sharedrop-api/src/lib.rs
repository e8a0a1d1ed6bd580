//! # sharedrop-api
//!
//! HTTP API layer for ShareDrop built on Axum.
//!
//! Provides the upload and download endpoints, DTOs, and the mapping
//! from domain errors to HTTP status codes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
