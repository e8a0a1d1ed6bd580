//! Link password hashing and verification.

pub mod guard;
