//! Error types for the wiretrace system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::ids::{CellId, GraphId, SurfaceId, WireId};

/// Result type alias for wiretrace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for wiretrace operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid client identity error.
    #[must_use]
    pub fn invalid_cid(cid: impl Into<String>, reason: &'static str) -> Self {
        Self::new(ErrorKind::InvalidCid {
            cid: cid.into(),
            reason,
        })
    }

    /// Creates an invalid logic digit error.
    #[must_use]
    pub fn invalid_logic(digit: char) -> Self {
        Self::new(ErrorKind::InvalidLogic(digit))
    }

    /// Creates a width mismatch error.
    #[must_use]
    pub fn width_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::WidthMismatch { expected, actual })
    }

    /// Creates a duplicate client identity error.
    #[must_use]
    pub fn duplicate_cid(cid: impl Into<String>, graph: GraphId) -> Self {
        Self::new(ErrorKind::DuplicateCid {
            cid: cid.into(),
            graph,
        })
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A client identity was empty or contained the identity separator.
    #[error("invalid cid {cid:?}: {reason}")]
    InvalidCid {
        /// The rejected identity.
        cid: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A character that is not a logic digit.
    #[error("invalid logic digit: {0:?}")]
    InvalidLogic(char),

    /// A bit-vector had the wrong width for its destination.
    #[error("width mismatch: expected {expected} bits, got {actual}")]
    WidthMismatch {
        /// Width of the destination.
        expected: usize,
        /// Width of the value offered.
        actual: usize,
    },

    /// Zero-width bit-vectors are not representable.
    #[error("bit-vector width must be at least 1")]
    ZeroWidth,

    /// Two elements in the same scope graph share a client identity.
    #[error("duplicate cid {cid:?} in {graph}")]
    DuplicateCid {
        /// The colliding identity.
        cid: String,
        /// The graph in which it collides.
        graph: GraphId,
    },

    /// Wire handle not minted by this simulation.
    #[error("unknown wire: {0}")]
    UnknownWire(WireId),

    /// Cell handle not minted by this simulation.
    #[error("unknown cell: {0}")]
    UnknownCell(CellId),

    /// Graph handle not minted by this simulation.
    #[error("unknown graph: {0}")]
    UnknownGraph(GraphId),

    /// Surface handle not minted by this simulation.
    #[error("unknown surface: {0}")]
    UnknownSurface(SurfaceId),

    /// Moving a subcircuit would make a scope its own ancestor.
    #[error("moving {cell} into {graph} would create a scope cycle")]
    ScopeCycle {
        /// The subcircuit being moved.
        cell: CellId,
        /// The destination graph.
        graph: GraphId,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed.
    pub operation: Option<String>,
    /// Identity path of the element involved, if known.
    pub identity: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the identity path of the element involved.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.identity) {
            (Some(op), Some(id)) => write!(f, "in {op} on {id}"),
            (Some(op), None) => write!(f, "in {op}"),
            (None, Some(id)) => write!(f, "on {id}"),
            (None, None) => Ok(()),
        }
    }
}
