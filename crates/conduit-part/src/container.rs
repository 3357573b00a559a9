//! Per-face part attachment.
//!
//! A container maps each face of one cable node to at most one part
//! instance. Slot operations are all-or-nothing: a failed attach or detach
//! leaves the container untouched.

use std::collections::BTreeMap;

use conduit_topology::Side;

use crate::{Error, PartKind, PartState, Result};

/// Per-position part slots, one per face.
#[derive(Debug, Default)]
pub struct PartContainer {
    slots: BTreeMap<Side, PartState>,
}

impl PartContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Attach a part of the given kind on a face.
    ///
    /// Fails with [`Error::OccupiedSlot`] if the face already holds a part.
    pub fn set_part(&mut self, side: Side, kind: PartKind) -> Result<()> {
        if self.slots.contains_key(&side) {
            return Err(Error::OccupiedSlot(side));
        }
        self.slots.insert(side, PartState::new(kind));
        Ok(())
    }

    /// Detach and return the part on a face.
    ///
    /// Fails with [`Error::EmptySlot`] if none is present. Callers fire the
    /// deactivation lifecycle against the owning network before removal.
    pub fn remove_part(&mut self, side: Side) -> Result<PartState> {
        self.slots.remove(&side).ok_or(Error::EmptySlot(side))
    }

    /// The part state on a face.
    pub fn part(&self, side: Side) -> Option<&PartState> {
        self.slots.get(&side)
    }

    /// Mutable part state on a face.
    pub fn part_mut(&mut self, side: Side) -> Option<&mut PartState> {
        self.slots.get_mut(&side)
    }

    /// Occupied faces, in side order.
    pub fn sides(&self) -> impl Iterator<Item = Side> + '_ {
        self.slots.keys().copied()
    }

    /// All attached parts, in side order.
    pub fn parts(&self) -> impl Iterator<Item = (Side, &PartState)> {
        self.slots.iter().map(|(side, state)| (*side, state))
    }

    /// All attached parts, mutably, in side order.
    pub fn parts_mut(&mut self) -> impl Iterator<Item = (Side, &mut PartState)> {
        self.slots.iter_mut().map(|(side, state)| (*side, state))
    }

    /// Whether any part is attached.
    pub fn has_parts(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Number of attached parts.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no part is attached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
