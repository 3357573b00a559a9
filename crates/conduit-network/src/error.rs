//! Error types for conduit-network.

use thiserror::Error;

use conduit_part::AspectId;
use conduit_topology::{Pos, Side};

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the grid facade.
///
/// Part and evaluation errors pass through unmodified, so failure causes
/// stay attributable to their origin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A part/container operation failed.
    #[error(transparent)]
    Part(#[from] conduit_part::Error),

    /// Variable evaluation failed; surfaced verbatim.
    #[error(transparent)]
    Eval(#[from] conduit_evaluate::EvalError),

    /// No aspect is selected on the addressed part.
    #[error("no aspect selected on {pos} side {side}")]
    NoSelection { pos: Pos, side: Side },

    /// The selected aspect is not a read aspect.
    #[error("aspect {0} is not readable")]
    NotReadable(AspectId),
}
