//! # sharedrop-service
//!
//! Link lifecycle services: token generation, upload ingestion, and
//! policy-checked retrieval. Services are stateless; the injected link
//! store and storage provider are the only shared resources.

pub mod ingest;
pub mod retrieve;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use ingest::{IngestRequest, IngestService};
pub use retrieve::{Download, RetrieveService};
pub use token::TokenGenerator;
