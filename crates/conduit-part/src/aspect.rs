//! Aspect descriptors and the capability registry.
//!
//! An aspect is a typed capability exposed by a part: read aspects observe,
//! write aspects mutate. Both classes are trait objects behind an
//! [`AspectRegistry`] keyed by stable string identifiers, so the set of
//! known aspects is explicit per registry instance.

use std::collections::HashMap;
use std::fmt;

use conduit_evaluate::{EvalContext, EvalError, Value, ValueType, VariableId};
use conduit_topology::{Pos, Side};

use crate::PartState;

/// Stable aspect identifier, e.g. `"signal.level"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AspectId(pub &'static str);

impl fmt::Display for AspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Read-only view of the network owning a position.
///
/// Keeps read aspects decoupled from the network implementation; reads can
/// observe but never mutate membership.
pub trait NetworkView {
    /// Number of member positions.
    fn position_count(&self) -> usize;

    /// Number of owned network elements.
    fn element_count(&self) -> usize;
}

/// Context handed to read aspects.
pub struct AspectContext<'a> {
    /// Position of the part's cable node.
    pub pos: Pos,
    /// Face the part is attached on.
    pub side: Side,
    /// The owning network, if the position is a member of one.
    pub network: Option<&'a dyn NetworkView>,
}

/// Typed capability descriptor common to both aspect classes.
pub trait Aspect {
    /// Stable identifier.
    fn id(&self) -> AspectId;

    /// The value type this aspect produces or consumes.
    fn value_type(&self) -> ValueType;
}

/// A read capability: computes a fresh value from part/network state.
pub trait Readable: Aspect {
    /// Produce the current value.
    ///
    /// Must not mutate network topology; the signature only hands out
    /// shared references.
    fn read(&self, state: &PartState, ctx: &AspectContext<'_>) -> Result<Value, EvalError>;
}

/// A write capability: consumes a variable on every update.
pub trait Writable: Aspect {
    /// Evaluate the variable and apply the resulting value to the part's
    /// effect.
    ///
    /// Evaluation failures propagate untouched, so failure causes remain
    /// attributable to the originating variable.
    fn write(
        &self,
        state: &mut PartState,
        ctx: &mut EvalContext<'_>,
        variable: VariableId,
    ) -> Result<(), EvalError>;

    /// The aspect has become active.
    fn on_activate(&self, state: &mut PartState);

    /// The aspect has become inactive.
    fn on_deactivate(&self, state: &mut PartState);
}

/// Explicitly constructed aspect store.
#[derive(Default)]
pub struct AspectRegistry {
    read: HashMap<AspectId, Box<dyn Readable>>,
    write: HashMap<AspectId, Box<dyn Writable>>,
}

impl AspectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            read: HashMap::new(),
            write: HashMap::new(),
        }
    }

    /// A registry holding the builtin aspect set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::aspects::register_builtins(&mut registry);
        registry
    }

    /// Register a read aspect under its own id.
    pub fn register_read(&mut self, aspect: Box<dyn Readable>) {
        self.read.insert(aspect.id(), aspect);
    }

    /// Register a write aspect under its own id.
    pub fn register_write(&mut self, aspect: Box<dyn Writable>) {
        self.write.insert(aspect.id(), aspect);
    }

    /// Look up a read aspect.
    pub fn read(&self, id: AspectId) -> Option<&dyn Readable> {
        self.read.get(&id).map(|a| a.as_ref())
    }

    /// Look up a write aspect.
    pub fn write(&self, id: AspectId) -> Option<&dyn Writable> {
        self.write.get(&id).map(|a| a.as_ref())
    }

    /// Whether the id names a registered aspect of either class.
    pub fn contains(&self, id: AspectId) -> bool {
        self.read.contains_key(&id) || self.write.contains_key(&id)
    }

    /// Whether the id names a write aspect.
    pub fn is_write(&self, id: AspectId) -> bool {
        self.write.contains_key(&id)
    }

    /// The value type of a registered aspect.
    pub fn value_type(&self, id: AspectId) -> Option<ValueType> {
        if let Some(aspect) = self.read.get(&id) {
            return Some(aspect.value_type());
        }
        self.write.get(&id).map(|a| a.value_type())
    }

    /// Number of registered aspects.
    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}

impl fmt::Debug for AspectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectRegistry")
            .field("read", &self.read.keys().collect::<Vec<_>>())
            .field("write", &self.write.keys().collect::<Vec<_>>())
            .finish()
    }
}
