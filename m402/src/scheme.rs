//! Payment schemes understood by this client.
//!
//! The set is closed: a requirement whose `scheme` string does not parse into
//! a [`Scheme`] is never selected. Supporting a new scheme means adding a
//! variant here and a matching arm in the negotiator's prove step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A payment scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Transfer of exactly the requested amount, proven by the payer.
    Exact,
}

impl Scheme {
    /// Returns the wire name of the scheme.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Scheme {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Error returned for a scheme name this client does not support.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported payment scheme '{0}'")]
pub struct UnsupportedSchemeError(pub String);

impl FromStr for Scheme {
    type Err = UnsupportedSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            other => Err(UnsupportedSchemeError(other.to_owned())),
        }
    }
}

impl Serialize for Scheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
