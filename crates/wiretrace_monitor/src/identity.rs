//! Hierarchical signal identity.
//!
//! A wire's identity is the path of client identities from the root-most
//! enclosing subcircuit down to the wire itself, joined with
//! [`Cid::SEPARATOR`]. It is recomputed from the live hierarchy every time:
//! subcircuits can be moved, so a stored path goes stale.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use wiretrace_foundation::{Cid, Hierarchy, Result, WireId};

/// The dot-joined, root-first path naming a wire's position.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SignalIdentity(Arc<str>);

impl SignalIdentity {
    /// Builds an identity from cids ordered root-first.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty.
    #[must_use]
    pub fn from_path<'a>(path: impl IntoIterator<Item = &'a Cid>) -> Self {
        let mut joined = String::new();
        for cid in path {
            if !joined.is_empty() {
                joined.push(Cid::SEPARATOR);
            }
            joined.push_str(cid.as_str());
        }
        assert!(!joined.is_empty(), "signal identity path must not be empty");
        Self(Arc::from(joined))
    }

    /// Parses a dot-joined identity, validating every segment as a [`Cid`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidCid` if any segment is empty.
    pub fn parse(path: &str) -> Result<Self> {
        for segment in path.split(Cid::SEPARATOR) {
            Cid::new(segment)?;
        }
        Ok(Self(Arc::from(path)))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path segments, root-first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(Cid::SEPARATOR)
    }

    /// Returns the wire's own cid.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.rsplit(Cid::SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Returns the number of subcircuits enclosing the wire.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.matches(Cid::SEPARATOR).count()
    }
}

impl Borrow<str> for SignalIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SignalIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalIdentity({})", self.0)
    }
}

impl fmt::Display for SignalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the identity of `wire` from the hierarchy as it is now.
///
/// Walks outward from the wire through each enclosing subcircuit cell, then
/// reverses so the root-most scope comes first. The walk is bounded by the
/// nesting depth; the hierarchy is assumed acyclic.
#[must_use]
pub fn resolve<H: Hierarchy + ?Sized>(hierarchy: &H, wire: WireId) -> SignalIdentity {
    let mut path = vec![hierarchy.wire_cid(wire)];
    let mut enclosing = hierarchy.graph_subcircuit(hierarchy.wire_graph(wire));
    while let Some(cell) = enclosing {
        path.push(hierarchy.cell_cid(cell));
        enclosing = hierarchy.graph_subcircuit(hierarchy.cell_graph(cell));
    }
    path.reverse();
    SignalIdentity::from_path(path)
}
