//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new UUID v7-based ID.
    ///
    /// UUID v7 is time-ordered and suitable as a database primary key;
    /// all entity ids in campus-rs use this form.
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::now_v7().to_string()
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable and shorter than UUIDs when
    /// represented as strings. Used for short-lived keys.
    #[must_use]
    pub fn generate_ulid(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Use UUID v4 for tokens (no time component)
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_v7() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 36); // UUID with hyphens
        assert_ne!(id1, id2);
        assert!(id1.starts_with('0')); // UUID v7 starts with version nibble
    }

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate_ulid();

        assert_eq!(id.len(), 26);
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
    }
}
