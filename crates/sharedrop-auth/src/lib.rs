//! # sharedrop-auth
//!
//! Credential guard for ShareDrop: hashing and verification of optional
//! link passwords using Argon2id.

pub mod password;

pub use password::guard::CredentialGuard;
