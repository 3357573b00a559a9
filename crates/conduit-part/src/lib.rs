//! Conduit Part & Aspect Engine
//!
//! Parts are capability-bearing attachments on the faces of cable nodes.
//! Each part kind exposes a fixed set of typed aspects: read aspects
//! produce a [`conduit_evaluate::Value`] from part/network state, write
//! aspects consume a variable and apply its value to the part's effect.
//!
//! # Activation Lifecycle
//!
//! A write aspect is *active* exactly when the owning position is a member
//! of a network AND the aspect is selected in the part state. The
//! `on_activate`/`on_deactivate` hooks fire exactly once per transition —
//! never redundantly on no-op changes — and are idempotent-safe.
//!
//! # Registries
//!
//! Aspects live behind an explicitly constructed [`AspectRegistry`] keyed
//! by stable string ids. There are no process-wide singletons.

mod aspect;
pub mod aspects;
mod container;
mod error;
mod part;

pub use aspect::{Aspect, AspectContext, AspectId, AspectRegistry, NetworkView, Readable, Writable};
pub use container::PartContainer;
pub use error::{Error, Result};
pub use part::{PartKind, PartState};
