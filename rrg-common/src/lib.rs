pub mod arch;
pub mod device_grid;

use std::fmt::{Display, Formatter};

/// Number of tiles added on each side of the core to hold the I/O ring.
pub const BORDER_MARGIN: u32 = 1;

/// Error kinds raised while building a tileable routing resource graph.
///
/// These are raised through `anyhow` and can be recovered with `downcast_ref` on any link of the
/// error chain.
#[derive(Debug, PartialEq, Eq)]
pub enum RrGraphError {
    /// Malformed or contradictory input to a pure function
    InvalidInput(String),
    /// A component produced output violating its own invariant
    InternalInconsistency(String),
    /// Structurally valid but unimplemented configuration
    Unsupported(String),
    /// Grid access outside of the device extent
    OutOfBounds { pos: (u32, u32), bounds: (u32, u32) },
}

impl Display for RrGraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::InvalidInput(s) => write!(f, "invalid input: {}", s),
            Self::InternalInconsistency(s) => write!(f, "internal inconsistency: {}", s),
            Self::Unsupported(s) => write!(f, "unsupported: {}", s),
            Self::OutOfBounds {
                pos: (ref x, ref y),
                bounds: (ref bx, ref by),
            } => write!(
                f,
                "grid access out of bounds: ({}, {}) exceeds ({}, {})",
                x, y, bx, by
            ),
        }
    }
}

impl std::error::Error for RrGraphError {}
