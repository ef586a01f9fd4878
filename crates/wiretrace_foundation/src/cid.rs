//! Scope-local client identities.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A client identity, unique among the elements of one scope graph.
///
/// Never empty and never contains [`Cid::SEPARATOR`], so joining a path of
/// cids with the separator is reversible.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cid(Arc<str>);

impl Cid {
    /// Separator used when joining cids into a hierarchical identity.
    pub const SEPARATOR: char = '.';

    /// Creates a client identity, validating its contents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCid` if `cid` is empty or contains the separator.
    pub fn new(cid: impl AsRef<str>) -> Result<Self> {
        let cid = cid.as_ref();
        if cid.is_empty() {
            return Err(Error::invalid_cid(cid, "empty"));
        }
        if cid.contains(Self::SEPARATOR) {
            return Err(Error::invalid_cid(cid, "contains the separator '.'"));
        }
        Ok(Self(Arc::from(cid)))
    }

    /// Generates the `n`th automatic identity, `c{n}`.
    #[must_use]
    pub fn generated(n: u64) -> Self {
        Self(Arc::from(format!("c{n}")))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Cid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Cid {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Cid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
