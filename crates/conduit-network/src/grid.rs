//! The grid facade.
//!
//! Single owner of the connectivity graph, the part containers, the
//! network manager and the registries. Host placement/removal/interaction
//! events enter here and are routed through connectivity refresh, network
//! re-derivation and the aspect activation lifecycle.
//!
//! All mutation is serialized through `&mut self`, so traversals always
//! observe a consistent snapshot and observers reading through `&self`
//! never see a partial re-derivation.

use tracing::info;

use conduit_evaluate::{Value, VariableId, VariableRegistry};
use conduit_part::{
    AspectContext, AspectId, AspectRegistry, NetworkView, PartContainer, PartKind, PartState,
};
use conduit_topology::{ConnectivityGraph, Pos, Side, SideSet};

use crate::{Error, Network, NetworkElement, NetworkId, NetworkManager, PartMap, Result};

/// The in-process cable world: graph, parts, networks and registries.
#[derive(Debug)]
pub struct Grid {
    graph: ConnectivityGraph,
    parts: PartMap,
    manager: NetworkManager,
    aspects: AspectRegistry,
    variables: VariableRegistry,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// A grid with the builtin aspect set.
    pub fn new() -> Self {
        Self::with_aspects(AspectRegistry::with_builtins())
    }

    /// A grid with a caller-supplied aspect registry.
    pub fn with_aspects(aspects: AspectRegistry) -> Self {
        Self {
            graph: ConnectivityGraph::new(),
            parts: PartMap::new(),
            manager: NetworkManager::new(),
            aspects,
            variables: VariableRegistry::new(),
        }
    }

    /// The connectivity graph.
    pub fn graph(&self) -> &ConnectivityGraph {
        &self.graph
    }

    /// The network manager.
    pub fn manager(&self) -> &NetworkManager {
        &self.manager
    }

    /// The aspect registry.
    pub fn aspects(&self) -> &AspectRegistry {
        &self.aspects
    }

    /// The variable registry.
    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    /// Mutable access to the variable registry, for composing variables.
    pub fn variables_mut(&mut self) -> &mut VariableRegistry {
        &mut self.variables
    }

    /// The part container at a position.
    pub fn container(&self, pos: Pos) -> Option<&PartContainer> {
        self.parts.get(&pos)
    }

    /// The part state on one face of a position.
    pub fn part(&self, pos: Pos, side: Side) -> Option<&PartState> {
        self.parts.get(&pos)?.part(side)
    }

    /// The network owning a position.
    pub fn network_at(&self, pos: Pos) -> Option<&Network> {
        self.manager.network_at(pos)
    }

    /// Host event: a cable node was placed.
    ///
    /// Refreshes connectivity of the node and its neighbours, then derives
    /// its network.
    pub fn node_added(&mut self, pos: Pos, accepts: SideSet) -> Option<NetworkId> {
        self.graph.insert(pos, accepts);
        self.graph.refresh(pos);
        self.graph.refresh_around(pos);
        info!(%pos, "cable added");
        self.reinit(pos)
    }

    /// Host event: a cable node is about to be removed.
    ///
    /// Deactivates and removes the node's network elements while the part
    /// state still exists.
    pub fn node_removing(&mut self, pos: Pos) {
        self.manager
            .drop_position(&mut self.parts, &self.aspects, pos);
    }

    /// Host event: a cable node is gone.
    ///
    /// Drops its container, refreshes the neighbours and re-derives their
    /// networks.
    pub fn node_removed(&mut self, pos: Pos) {
        self.parts.remove(&pos);
        self.graph.remove(pos);
        self.graph.refresh_around(pos);
        info!(%pos, "cable removed");
        self.reinit_neighbors(pos);
    }

    /// Remove a cable node, both phases.
    pub fn remove_node(&mut self, pos: Pos) {
        self.node_removing(pos);
        self.node_removed(pos);
    }

    /// Remove the cable at a position, keeping attached parts.
    ///
    /// With parts still attached the node degrades to a phantom: it stays
    /// addressable for part operations but leaves its network and refuses
    /// all connections. Without parts this is a plain removal.
    pub fn remove_cable(&mut self, pos: Pos) {
        if !self.graph.contains(pos) {
            return;
        }
        self.node_removing(pos);
        if self.parts.get(&pos).is_some_and(|c| c.has_parts()) {
            self.graph.set_phantom(pos, true);
            self.graph.refresh(pos);
            self.graph.refresh_around(pos);
            info!(%pos, "cable degraded to phantom");
            self.reinit_neighbors(pos);
        } else {
            self.node_removed(pos);
        }
    }

    /// Restore a phantom back into a real cable and re-join its networks.
    pub fn restore_cable(&mut self, pos: Pos) -> Option<NetworkId> {
        if !self.graph.is_phantom(pos) {
            return None;
        }
        self.graph.set_phantom(pos, false);
        self.graph.refresh(pos);
        self.graph.refresh_around(pos);
        info!(%pos, "phantom cable restored");
        self.reinit(pos)
    }

    /// Explicitly disconnect one side of a cable.
    ///
    /// Both endpoints refresh and re-derive independently; if no alternate
    /// path exists the network splits.
    pub fn sever(&mut self, pos: Pos, side: Side) {
        if !self.graph.sever(pos, side) {
            return;
        }
        self.graph.refresh(pos);
        self.graph.refresh_around(pos);
        self.reinit(pos);
        self.reinit(pos.offset(side));
    }

    /// Undo an explicit disconnect and re-derive from both endpoints.
    pub fn rejoin(&mut self, pos: Pos, side: Side) {
        self.graph.rejoin(pos, side);
        self.graph.refresh(pos);
        self.graph.refresh_around(pos);
        self.reinit(pos);
        self.reinit(pos.offset(side));
    }

    /// Attach a part on one face of a position.
    ///
    /// The part contributes an element to the owning network right away;
    /// its write aspects activate once an aspect is selected.
    pub fn set_part(&mut self, pos: Pos, side: Side, kind: PartKind) -> Result<()> {
        let container = self.parts.entry(pos).or_default();
        container.set_part(side, kind).map_err(Error::Part)?;
        if let Some(id) = self.manager.owner(pos) {
            self.manager.add_element(
                &mut self.parts,
                &self.aspects,
                id,
                NetworkElement::new(pos, side),
            );
        }
        Ok(())
    }

    /// Detach and return the part on one face of a position.
    ///
    /// Fires `on_deactivate` for its active write aspect against the
    /// owning network before removal.
    pub fn remove_part(&mut self, pos: Pos, side: Side) -> Result<PartState> {
        if self.parts.get(&pos).and_then(|c| c.part(side)).is_none() {
            return Err(Error::Part(conduit_part::Error::EmptySlot(side)));
        }
        if let Some(id) = self.manager.owner(pos) {
            self.manager.remove_path_element(
                &mut self.parts,
                &self.aspects,
                id,
                NetworkElement::new(pos, side),
            );
        }
        let Some(container) = self.parts.get_mut(&pos) else {
            return Err(Error::Part(conduit_part::Error::EmptySlot(side)));
        };
        let state = container.remove_part(side).map_err(Error::Part)?;
        if container.is_empty() {
            self.parts.remove(&pos);
            // A phantom that lost its last part vanishes entirely
            if self.graph.is_phantom(pos) {
                self.graph.remove(pos);
                self.graph.refresh_around(pos);
            }
        }
        Ok(state)
    }

    /// Select which aspect of a part is active, routing through the
    /// activation lifecycle.
    pub fn select_aspect(
        &mut self,
        pos: Pos,
        side: Side,
        selection: Option<AspectId>,
    ) -> Result<()> {
        let Some(state) = self.parts.get_mut(&pos).and_then(|c| c.part_mut(side)) else {
            return Err(Error::Part(conduit_part::Error::EmptySlot(side)));
        };
        state
            .select_aspect(&self.aspects, selection)
            .map_err(Error::Part)
    }

    /// Bind a variable to one of a part's aspects; type-checked here, at
    /// composition time.
    pub fn bind_variable(
        &mut self,
        pos: Pos,
        side: Side,
        aspect: AspectId,
        variable: VariableId,
    ) -> Result<()> {
        let Some(state) = self.parts.get_mut(&pos).and_then(|c| c.part_mut(side)) else {
            return Err(Error::Part(conduit_part::Error::EmptySlot(side)));
        };
        state
            .bind_variable(&self.aspects, &self.variables, aspect, variable)
            .map_err(Error::Part)
    }

    /// Query the selected read aspect of a part.
    pub fn read(&self, pos: Pos, side: Side) -> Result<Value> {
        let Some(state) = self.parts.get(&pos).and_then(|c| c.part(side)) else {
            return Err(Error::Part(conduit_part::Error::EmptySlot(side)));
        };
        let selected = state.selected().ok_or(Error::NoSelection { pos, side })?;
        let aspect = self
            .aspects
            .read(selected)
            .ok_or(Error::NotReadable(selected))?;
        let ctx = AspectContext {
            pos,
            side,
            network: self.manager.network_at(pos).map(|n| n as &dyn NetworkView),
        };
        aspect.read(state, &ctx).map_err(Error::Eval)
    }

    /// One serialized update step: active write aspects evaluate their
    /// bound variables and apply the results.
    pub fn update(&mut self) {
        self.manager
            .update(&mut self.parts, &self.aspects, &self.variables);
    }

    /// Host load contract: refresh every known position, then re-derive
    /// every network.
    pub fn rebuild(&mut self) {
        let positions: Vec<Pos> = self.graph.positions().collect();
        for &pos in &positions {
            self.graph.refresh(pos);
        }
        for &pos in &positions {
            self.reinit(pos);
        }
        info!(count = positions.len(), "rebuilt networks");
    }

    fn reinit(&mut self, pos: Pos) -> Option<NetworkId> {
        self.manager
            .init_network(&self.graph, &mut self.parts, &self.aspects, pos)
    }

    fn reinit_neighbors(&mut self, pos: Pos) {
        for (_, neighbor) in pos.adjacent() {
            self.reinit(neighbor);
        }
    }
}
