//! Who may post or start topics in a forum
//!
//! Stored as SMALLINT in the database.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum AccessLevel {
    /// Nobody, not even staff
    Nobody = 0,
    /// Anyone holding an actor
    All = 1,
    /// Registered users
    #[default]
    Users = 2,
    /// Superusers and members of the forum's group
    Custom = 3,
}

impl AccessLevel {
    #[inline]
    pub fn to_i16(self) -> i16 {
        self as i16
    }

    /// Unknown values fall back to the default
    pub fn from_i16(value: i16) -> Self {
        match value {
            0 => Self::Nobody,
            1 => Self::All,
            3 => Self::Custom,
            _ => Self::Users,
        }
    }

    /// Whether membership in the forum's group has to be checked
    #[inline]
    pub fn needs_group(self) -> bool {
        self == Self::Custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_values() {
        for level in [
            AccessLevel::Nobody,
            AccessLevel::All,
            AccessLevel::Users,
            AccessLevel::Custom,
        ] {
            assert_eq!(AccessLevel::from_i16(level.to_i16()), level);
        }
        assert_eq!(AccessLevel::from_i16(42), AccessLevel::Users);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AccessLevel::Custom).unwrap();
        assert_eq!(json, "\"custom\"");
    }
}
