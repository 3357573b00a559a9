//! Error types for conduit-part.

use thiserror::Error;

use conduit_evaluate::BindError;
use conduit_topology::Side;

use crate::AspectId;

/// Result type for part operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by part and aspect operations.
///
/// All operations are all-or-nothing: a returned error leaves shared state
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The side already holds a part.
    #[error("side {0} already holds a part")]
    OccupiedSlot(Side),

    /// No part is attached on the side.
    #[error("no part on side {0}")]
    EmptySlot(Side),

    /// The aspect id is not registered.
    #[error("unknown aspect {0}")]
    UnknownAspect(AspectId),

    /// The part kind does not expose the aspect.
    #[error("part {part} does not expose aspect {aspect}")]
    ForeignAspect {
        part: &'static str,
        aspect: AspectId,
    },

    /// Aspect/variable composition failed the bind-time type check.
    #[error(transparent)]
    Bind(#[from] BindError),
}
