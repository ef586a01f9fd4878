//! Handles to elements owned by a simulation.
//!
//! Handles are minted by the simulation that owns the element and are only
//! meaningful to it. They are plain indices: holding one does not keep the
//! element alive, and the monitor never dereferences one on its own.

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw index.
            #[must_use]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

define_handle!(
    /// A value-carrying wire.
    WireId,
    "Wire"
);

define_handle!(
    /// A cell placed in a scope graph. Subcircuit instances are cells that
    /// own an inner graph.
    CellId,
    "Cell"
);

define_handle!(
    /// A scope graph: the root circuit or the body of a subcircuit.
    GraphId,
    "Graph"
);

define_handle!(
    /// A rendering surface on which the user toggles tracking.
    SurfaceId,
    "Surface"
);
