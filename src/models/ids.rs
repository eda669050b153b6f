//! Strongly-typed client identifier
//!
//! Roster ids are zero-padded sequence numbers rendered as `CL-0007`. The
//! newtype keeps ordering numeric (so `CL-0010` sorts after `CL-0009`) and
//! prevents mixing ids up with trading codes in function signatures.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Display prefix for client ids
const CLIENT_ID_PREFIX: &str = "CL-";

/// Identifier of a client in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u32);

impl ClientId {
    /// Create an id from a sequence number
    pub fn from_seq(seq: u32) -> Self {
        Self(seq)
    }

    /// The underlying sequence number
    pub fn seq(&self) -> u32 {
        self.0
    }

    /// The id that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", CLIENT_ID_PREFIX, self.0)
    }
}

/// Error returned when a client id fails to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClientIdError(String);

impl fmt::Display for ParseClientIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid client id (expected CL-NNNN)", self.0)
    }
}

impl std::error::Error for ParseClientIdError {}

impl FromStr for ClientId {
    type Err = ParseClientIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(CLIENT_ID_PREFIX)
            .or_else(|| trimmed.strip_prefix("cl-"))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseClientIdError(s.to_string()))
    }
}

impl Serialize for ClientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_zero_pads_to_four_digits() {
        assert_eq!(ClientId::from_seq(7).to_string(), "CL-0007");
        assert_eq!(ClientId::from_seq(123).to_string(), "CL-0123");
        assert_eq!(ClientId::from_seq(12345).to_string(), "CL-12345");
    }

    #[test]
    fn test_parse_accepts_prefixed_and_bare_forms() {
        assert_eq!("CL-0007".parse::<ClientId>().unwrap(), ClientId::from_seq(7));
        assert_eq!("cl-7".parse::<ClientId>().unwrap(), ClientId::from_seq(7));
        assert_eq!("42".parse::<ClientId>().unwrap(), ClientId::from_seq(42));
        assert!("CL-".parse::<ClientId>().is_err());
        assert!("ACME".parse::<ClientId>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(ClientId::from_seq(9) < ClientId::from_seq(10));
        assert!(ClientId::from_seq(9999) < ClientId::from_seq(10000));
    }

    #[test]
    fn test_next() {
        assert_eq!(ClientId::from_seq(7).next(), ClientId::from_seq(8));
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_string(&ClientId::from_seq(7)).unwrap();
        assert_eq!(json, "\"CL-0007\"");

        let id: ClientId = serde_json::from_str("\"CL-0007\"").unwrap();
        assert_eq!(id, ClientId::from_seq(7));
    }
}
