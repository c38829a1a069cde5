//! Stable region identifiers.
//!
//! Regions are numbered from 1 in ranked order and rendered as `change-<n>`,
//! which is also the identifier text labels anchor to.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "change-";

/// Identifier of a ranked change region.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a RegionId from a 1-based rank.
    #[inline]
    pub fn new(rank: u32) -> Self {
        Self(rank)
    }

    /// Returns the 1-based rank.
    #[inline]
    pub fn rank(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

impl FromStr for RegionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PREFIX)
            .and_then(|n| n.parse::<u32>().ok())
            .map(RegionId)
            .ok_or_else(|| format!("invalid region id '{s}' (expected '{PREFIX}<n>')"))
    }
}

impl Serialize for RegionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = RegionId::new(3);
        assert_eq!(id.to_string(), "change-3");
        assert_eq!("change-3".parse::<RegionId>(), Ok(id));
        assert!("region-3".parse::<RegionId>().is_err());
        assert!("change-".parse::<RegionId>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&RegionId::new(12)).expect("serialize");
        assert_eq!(json, "\"change-12\"");
        let back: RegionId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.rank(), 12);
    }

    #[test]
    fn test_ordering_follows_rank() {
        assert!(RegionId::new(1) < RegionId::new(2));
    }
}
