//! Share token generation.

use uuid::Uuid;

/// Generates public share tokens.
///
/// Tokens are hyphenless UUID v4 strings: 122 bits of randomness, so a
/// collision is negligible in practice, and the storage layer's unique
/// index catches the astronomically unlikely duplicate. Tokens carry no
/// ordering and are independent of the storage key.
#[derive(Debug, Clone)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh random token.
    pub fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
