//! Conduit Variable Evaluation
//!
//! Typed values and the lazy, pull-based variable engine.
//!
//! # Design
//!
//! Variables are registered in an explicitly constructed
//! [`VariableRegistry`] and evaluated on demand. Evaluation either yields a
//! [`Value`] of the variable's declared [`ValueType`] or fails with a typed
//! [`EvalError`] — never a panic. Cycle detection threads an explicit
//! visiting stack through recursive evaluation, so self-referential chains
//! of any length fail with [`EvalError::CyclicReference`] instead of
//! recursing unboundedly.
//!
//! # Static Typing
//!
//! Composition is checked at bind time: operator operands and reference
//! targets must carry the declared [`ValueType`], and mismatches fail fast
//! with [`BindError::TypeMismatch`]. A successfully bound expression cannot
//! type-fail at evaluation time.

mod error;
mod value;
mod variable;

pub use error::{BindError, EvalError, Result};
pub use value::{Value, ValueType};
pub use variable::{Constant, EvalContext, Op, Operation, Reference, Variable, VariableId, VariableRegistry};
