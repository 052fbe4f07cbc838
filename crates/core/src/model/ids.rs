use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a course module.
///
/// Stable across catalog revisions; also used as the seed for the
/// per-module option shuffle and as the key of the completed set and
/// answers map, so reordering the catalog never orphans progress.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u64);

impl ModuleId {
    /// Creates a new `ModuleId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Identifier for a course phase: a single ASCII uppercase letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhaseId(char);

impl PhaseId {
    /// Creates a `PhaseId` from an ASCII uppercase letter.
    #[must_use]
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then_some(Self(letter))
    }

    /// Returns the underlying letter
    #[must_use]
    pub fn letter(&self) -> char {
        self.0
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

impl fmt::Debug for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhaseId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ModuleId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(ModuleId::new).map_err(|_| ParseIdError {
            kind: "ModuleId".to_string(),
        })
    }
}

impl FromStr for PhaseId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => PhaseId::new(letter).ok_or_else(|| ParseIdError {
                kind: "PhaseId".to_string(),
            }),
            _ => Err(ParseIdError {
                kind: "PhaseId".to_string(),
            }),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_display() {
        let id = ModuleId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_module_id_from_str() {
        let id: ModuleId = "123".parse().unwrap();
        assert_eq!(id, ModuleId::new(123));
    }

    #[test]
    fn test_module_id_from_str_invalid() {
        let result = "not-a-number".parse::<ModuleId>();
        assert!(result.is_err());
    }

    #[test]
    fn test_phase_id_display() {
        let id = PhaseId::new('B').unwrap();
        assert_eq!(id.to_string(), "B");
    }

    #[test]
    fn test_phase_id_from_str() {
        let id: PhaseId = "C".parse().unwrap();
        assert_eq!(id, PhaseId::new('C').unwrap());
    }

    #[test]
    fn test_phase_id_rejects_lowercase() {
        assert!(PhaseId::new('a').is_none());
        assert!("a".parse::<PhaseId>().is_err());
    }

    #[test]
    fn test_phase_id_rejects_multichar() {
        assert!("AB".parse::<PhaseId>().is_err());
        assert!("".parse::<PhaseId>().is_err());
    }

    #[test]
    fn test_id_roundtrip() {
        let original = ModuleId::new(42);
        let serialized = original.to_string();
        let deserialized: ModuleId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
