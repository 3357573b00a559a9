//! Conduit Network Derivation
//!
//! Keeps the partition of the cable graph into networks consistent as the
//! topology mutates, and owns each network's element membership.
//!
//! # Derivation
//!
//! Networks are re-derived lazily: any topology change triggers
//! [`NetworkManager::init_network`] from the affected positions. The
//! traversal collects the reachable component over active edges, reuses an
//! existing owning network when one is reached, merges several reached
//! networks into one, and re-claims the survivor to exactly the component.
//! Splits need no eager detection — both endpoints of a severed edge
//! re-derive independently, and the second traversal simply cannot reach
//! positions re-claimed by the first.
//!
//! # Ownership
//!
//! The manager is the sole mutator of network membership. Part and aspect
//! code observe membership through read-only views; every mutation is
//! serialized through `&mut` access to one [`Grid`].

mod element;
mod error;
mod grid;
mod manager;
mod network;

pub use element::NetworkElement;
pub use error::{Error, Result};
pub use grid::Grid;
pub use manager::{NetworkManager, PartMap};
pub use network::{Network, NetworkId};
