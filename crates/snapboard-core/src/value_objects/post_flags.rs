//! Moderation flags carried by a post
//!
//! Stored as SMALLINT in the database.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// State flags a moderator (or the author, for `DELETED`) can toggle
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PostFlags: u16 {
        /// Hidden from regular readers after an upheld abuse report
        const CENSORED  = 1 << 0;
        /// Abuse reports are no longer accepted (superuser only)
        const PROTECTED = 1 << 1;
        /// Soft deleted; history is kept
        const DELETED   = 1 << 2;
    }
}

impl PostFlags {
    /// Whether regular readers should see the post body
    #[inline]
    pub fn is_visible(self) -> bool {
        !self.intersects(Self::CENSORED | Self::DELETED)
    }

    #[inline]
    pub fn to_i16(self) -> i16 {
        self.bits() as i16
    }

    /// Unknown bits are dropped
    #[inline]
    pub fn from_i16(bits: i16) -> Self {
        Self::from_bits_truncate(bits as u16)
    }

    /// Names of the set flags, lowercase
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::CENSORED) {
            names.push("censored");
        }
        if self.contains(Self::PROTECTED) {
            names.push("protected");
        }
        if self.contains(Self::DELETED) {
            names.push("deleted");
        }
        names
    }
}

impl Serialize for PostFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for PostFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}
