//! Network derivation and membership.
//!
//! The manager maps positions to their owning network and re-derives that
//! partition on demand. Activation hooks fire only on membership
//! transitions between no-network and some-network: positions transferred
//! atomically between live networks (merges, absorptions) keep their parts
//! active throughout.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use conduit_evaluate::{EvalContext, VariableRegistry};
use conduit_part::{AspectRegistry, PartContainer};
use conduit_topology::{ConnectivityGraph, Pos};

use crate::{Network, NetworkElement, NetworkId};

/// Part containers by position; owned by the grid, threaded through the
/// manager so membership changes can drive the activation lifecycle.
pub type PartMap = HashMap<Pos, PartContainer>;

/// Derives and owns the partition of the cable graph into networks.
///
/// Sole mutator of network membership.
#[derive(Debug, Default)]
pub struct NetworkManager {
    networks: HashMap<NetworkId, Network>,
    owner: HashMap<Pos, NetworkId>,
    next_id: u64,
    created: u64,
}

impl NetworkManager {
    /// Create a manager with no networks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A network by handle.
    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.networks.get(&id)
    }

    /// The handle of the network owning a position.
    pub fn owner(&self, pos: Pos) -> Option<NetworkId> {
        self.owner.get(&pos).copied()
    }

    /// The network owning a position.
    pub fn network_at(&self, pos: Pos) -> Option<&Network> {
        self.networks.get(self.owner.get(&pos)?)
    }

    /// All live networks, in arbitrary order.
    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    /// Number of live networks.
    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Re-derive the network containing `start`.
    ///
    /// Traverses the reachable component over active edges. An existing
    /// network owning any reached position is reused; several reached
    /// networks merge (larger element count survives, ties to the lowest
    /// creation order). The survivor is then re-claimed to exactly the
    /// component: positions it owned beyond the component are released,
    /// newly reached positions are claimed. Idempotent on a stable
    /// topology — repeated calls change no ownership and create no
    /// networks.
    ///
    /// Returns `None` when `start` is no real cable node.
    pub fn init_network(
        &mut self,
        graph: &ConnectivityGraph,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        start: Pos,
    ) -> Option<NetworkId> {
        if !graph.is_real(start) {
            return None;
        }

        let component = reachable_component(graph, start);

        // Existing owners among the component, in traversal-independent order
        let mut owners: Vec<NetworkId> = Vec::new();
        for pos in &component {
            if let Some(id) = self.owner.get(pos) {
                if !owners.contains(id) {
                    owners.push(*id);
                }
            }
        }

        let survivor = match owners.split_first() {
            None => self.create_network(),
            Some((first, rest)) => {
                let mut survivor = *first;
                for other in rest {
                    survivor = self.merge(survivor, *other);
                }
                survivor
            }
        };

        self.reclaim(parts, aspects, survivor, &component);
        Some(survivor)
    }

    /// Remove an element from a network.
    ///
    /// The element's part is deactivated first; the network is destroyed
    /// when its element and position sets are both empty. Returns whether
    /// the element was present.
    pub fn remove_path_element(
        &mut self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        id: NetworkId,
        element: NetworkElement,
    ) -> bool {
        let Some(network) = self.networks.get_mut(&id) else {
            return false;
        };
        if !network.remove_element(element) {
            return false;
        }
        if let Some(state) = parts
            .get_mut(&element.pos)
            .and_then(|c| c.part_mut(element.side))
        {
            state.apply_membership(aspects, false);
        }
        self.destroy_if_empty(id);
        true
    }

    /// Contribute an element to a live network, activating its part.
    pub fn add_element(
        &mut self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        id: NetworkId,
        element: NetworkElement,
    ) -> bool {
        let Some(network) = self.networks.get_mut(&id) else {
            return false;
        };
        network.add_element(element);
        if let Some(state) = parts
            .get_mut(&element.pos)
            .and_then(|c| c.part_mut(element.side))
        {
            state.apply_membership(aspects, true);
        }
        true
    }

    /// Release a position from its owning network, deactivating the parts
    /// attached there. Used when the cable node itself goes away.
    pub fn drop_position(&mut self, parts: &mut PartMap, aspects: &AspectRegistry, pos: Pos) {
        if let Some(id) = self.owner.get(&pos).copied() {
            self.release_position(parts, aspects, id, pos);
        }
    }

    /// One serialized update step: every active write aspect with a bound
    /// variable evaluates it and applies the result.
    ///
    /// Evaluation failures land on the part's diagnostic surface; the
    /// network keeps functioning.
    pub fn update(
        &self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        variables: &VariableRegistry,
    ) {
        let mut ids: Vec<NetworkId> = self.networks.keys().copied().collect();
        ids.sort();
        for id in ids {
            let Some(network) = self.networks.get(&id) else {
                continue;
            };
            for element in network.elements() {
                let Some(state) = parts
                    .get_mut(&element.pos)
                    .and_then(|c| c.part_mut(element.side))
                else {
                    continue;
                };
                if !state.is_active() {
                    continue;
                }
                let (Some(selected), Some(variable)) = (state.selected(), state.target()) else {
                    continue;
                };
                let Some(aspect) = aspects.write(selected) else {
                    continue;
                };
                let mut ctx = EvalContext::new(variables);
                if let Err(error) = aspect.write(state, &mut ctx, variable) {
                    debug!(%element, %error, "write aspect failed");
                    state.record_failure(error);
                }
            }
        }
    }

    fn create_network(&mut self) -> NetworkId {
        let id = NetworkId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.networks.insert(id, Network::new(id, self.created));
        debug!(network = %id, "created network");
        id
    }

    /// Merge two live networks; returns the survivor.
    ///
    /// The network with more elements survives; equal counts fall back to
    /// the lower creation order. The absorbed network's members transfer
    /// without activation hooks — they stay in a network throughout.
    fn merge(&mut self, a: NetworkId, b: NetworkId) -> NetworkId {
        if a == b {
            return a;
        }
        let (keep, absorb) = match (self.networks.get(&a), self.networks.get(&b)) {
            (Some(na), Some(nb)) => {
                let a_wins = na.element_count() > nb.element_count()
                    || (na.element_count() == nb.element_count()
                        && na.creation_order() < nb.creation_order());
                if a_wins {
                    (a, b)
                } else {
                    (b, a)
                }
            }
            (Some(_), None) => return a,
            _ => return b,
        };
        if let Some(absorbed) = self.networks.remove(&absorb) {
            for pos in absorbed.positions() {
                self.owner.insert(pos, keep);
            }
            if let Some(network) = self.networks.get_mut(&keep) {
                network.absorb(absorbed);
            }
            debug!(survivor = %keep, absorbed = %absorb, "merged networks");
        }
        keep
    }

    /// Re-claim a network to exactly the given component.
    fn reclaim(
        &mut self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        id: NetworkId,
        component: &BTreeSet<Pos>,
    ) {
        let stale: Vec<Pos> = self
            .networks
            .get(&id)
            .map(|n| n.positions().filter(|p| !component.contains(p)).collect())
            .unwrap_or_default();
        for pos in stale {
            self.release_position(parts, aspects, id, pos);
        }
        for &pos in component {
            if self.owner.get(&pos) != Some(&id) {
                self.owner.insert(pos, id);
                if let Some(network) = self.networks.get_mut(&id) {
                    network.add_position(pos);
                }
            }
            // Unchanged membership fires no hooks: element insertion and
            // apply_membership are both no-ops for parts already counted in
            self.sync_elements(parts, aspects, id, pos);
        }
    }

    /// Align a member position's elements with its attached parts.
    fn sync_elements(
        &mut self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        id: NetworkId,
        pos: Pos,
    ) {
        let Some(network) = self.networks.get_mut(&id) else {
            return;
        };
        if let Some(container) = parts.get_mut(&pos) {
            for (side, state) in container.parts_mut() {
                network.add_element(NetworkElement::new(pos, side));
                state.apply_membership(aspects, true);
            }
        }
    }

    fn release_position(
        &mut self,
        parts: &mut PartMap,
        aspects: &AspectRegistry,
        id: NetworkId,
        pos: Pos,
    ) {
        if self.owner.get(&pos) == Some(&id) {
            self.owner.remove(&pos);
        }
        if let Some(network) = self.networks.get_mut(&id) {
            network.remove_position(pos);
            if let Some(container) = parts.get_mut(&pos) {
                for (side, state) in container.parts_mut() {
                    network.remove_element(NetworkElement::new(pos, side));
                    state.apply_membership(aspects, false);
                }
            }
        }
        self.destroy_if_empty(id);
    }

    fn destroy_if_empty(&mut self, id: NetworkId) {
        if self.networks.get(&id).is_some_and(|n| n.is_empty()) {
            self.networks.remove(&id);
            debug!(network = %id, "destroyed empty network");
        }
    }
}

/// Collect the component reachable from `start` over active edges.
///
/// Breadth-first over the graph's sole traversal primitive. The caller
/// holds `&ConnectivityGraph` for the whole walk, so the snapshot is
/// consistent by construction.
fn reachable_component(graph: &ConnectivityGraph, start: Pos) -> BTreeSet<Pos> {
    let mut component = BTreeSet::new();
    let mut frontier = VecDeque::new();
    component.insert(start);
    frontier.push_back(start);
    while let Some(pos) = frontier.pop_front() {
        for (_, next) in graph.neighbors(pos) {
            if component.insert(next) {
                frontier.push_back(next);
            }
        }
    }
    component
}
