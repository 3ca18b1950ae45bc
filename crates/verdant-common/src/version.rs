//! Version types for persisted blob compatibility.

use serde::{Deserialize, Serialize};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current clock state blob version.
    pub const CLOCK_STATE: Self = Self::new(1, 0, 0);

    /// Current garden snapshot blob version.
    pub const GARDEN_SNAPSHOT: Self = Self::new(1, 0, 0);

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Magic bytes for blob identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicBytes(pub [u8; 4]);

impl MagicBytes {
    /// Clock state blob.
    pub const CLOCK: Self = Self(*b"VDCK");

    /// Garden snapshot blob.
    pub const GARDEN: Self = Self(*b"VDGS");

    /// Returns the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_read_same_major() {
        let current = SchemaVersion::new(1, 2, 0);
        assert!(current.can_read(&SchemaVersion::new(1, 5, 3)));
        assert!(!current.can_read(&SchemaVersion::new(2, 0, 0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaVersion::CLOCK_STATE.to_string(), "1.0.0");
    }

    #[test]
    fn test_magic_bytes_distinct() {
        assert_ne!(MagicBytes::CLOCK, MagicBytes::GARDEN);
        assert_eq!(MagicBytes::CLOCK.bytes(), b"VDCK");
    }
}
