//! Error types for conduit-evaluate.

use thiserror::Error;

use crate::{ValueType, VariableId};

/// Result type for evaluation.
pub type Result<T> = std::result::Result<T, EvalError>;

/// A typed evaluation failure.
///
/// First-class results, not host-level faults: consumers handle the failure
/// path explicitly and the network keeps functioning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A variable participates in its own dependency chain.
    #[error("cyclic reference through {0}")]
    CyclicReference(VariableId),

    /// The referenced variable is not registered.
    #[error("unknown variable {0}")]
    UnknownVariable(VariableId),

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Domain-specific computation failure, surfaced verbatim from the
    /// originating variable.
    #[error("{0}")]
    Failure(String),
}

/// A composition-time failure.
///
/// Reported synchronously to the binding operation; shared state is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The declared and provided value types disagree.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },

    /// Wrong operand count for an operator.
    #[error("operator {op} takes {expected} operands, {found} given")]
    Arity {
        op: &'static str,
        expected: usize,
        found: usize,
    },

    /// The referenced variable is not registered.
    #[error("unknown variable {0}")]
    UnknownVariable(VariableId),
}
