//! Cable connectivity state.
//!
//! Tracks which cable nodes exist and which of their six faces currently
//! hold a connection. Connection flags are purely local per node; an edge
//! is active only when both endpoints' flags for the mutual faces are set.
//!
//! Flags are recomputed exclusively by [`ConnectivityGraph::refresh`],
//! which evaluates the symmetric can-connect predicate at that moment.
//! An edge that is already active is never implicitly re-checked: explicit
//! sever/rejoin (or node mutation plus refresh) is what re-evaluates it.

use std::collections::HashMap;

use crate::{Pos, Side, SideSet};

/// Per-node connectivity state.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CableNode {
    /// Sides on which this node's type accepts connections.
    accepts: SideSet,
    /// Sides explicitly disconnected; they block `can_connect` until rejoined.
    severed: SideSet,
    /// Local connection flags, maintained by refresh.
    joined: SideSet,
    /// Phantom nodes keep holding their parts but refuse all connections.
    phantom: bool,
}

impl CableNode {
    fn new(accepts: SideSet) -> Self {
        Self {
            accepts,
            severed: SideSet::NONE,
            joined: SideSet::NONE,
            phantom: false,
        }
    }

    /// Sides this node's type accepts connections on.
    pub fn accepts(&self) -> SideSet {
        self.accepts
    }

    /// Sides currently flagged as connected.
    pub fn joined(&self) -> SideSet {
        self.joined
    }

    /// Sides explicitly severed.
    pub fn severed(&self) -> SideSet {
        self.severed
    }
}

/// Adjacency state of all cable nodes.
///
/// Mapping from position to per-side connection flags. The graph never
/// derives networks itself; [`neighbors`](ConnectivityGraph::neighbors) is
/// the sole traversal primitive offered to the partitioning layer.
#[derive(Debug, Default)]
pub struct ConnectivityGraph {
    nodes: HashMap<Pos, CableNode>,
}

impl ConnectivityGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a cable node accepting connections on the given sides.
    ///
    /// Re-inserting an existing position resets its per-side state.
    pub fn insert(&mut self, pos: Pos, accepts: SideSet) {
        self.nodes.insert(pos, CableNode::new(accepts));
    }

    /// Remove a cable node. Returns whether it was present.
    ///
    /// Only local state is cleared; callers refresh the neighbours so their
    /// flags toward the vacated position drop.
    pub fn remove(&mut self, pos: Pos) -> bool {
        self.nodes.remove(&pos).is_some()
    }

    /// Whether a node exists at the position (phantom or not).
    pub fn contains(&self, pos: Pos) -> bool {
        self.nodes.contains_key(&pos)
    }

    /// Whether a non-phantom cable node exists at the position.
    pub fn is_real(&self, pos: Pos) -> bool {
        self.nodes.get(&pos).is_some_and(|n| !n.phantom)
    }

    /// Node state at a position.
    pub fn node(&self, pos: Pos) -> Option<&CableNode> {
        self.nodes.get(&pos)
    }

    /// Mark or unmark a node as phantom. Returns whether the node exists.
    ///
    /// Phantom nodes stay registered (their part container survives) but
    /// fail `can_connect` in both directions.
    pub fn set_phantom(&mut self, pos: Pos, phantom: bool) -> bool {
        match self.nodes.get_mut(&pos) {
            Some(node) => {
                node.phantom = phantom;
                true
            }
            None => false,
        }
    }

    /// Whether the node at the position is a phantom.
    pub fn is_phantom(&self, pos: Pos) -> bool {
        self.nodes.get(&pos).is_some_and(|n| n.phantom)
    }

    /// Set the local connection flag for one side of one node.
    ///
    /// Mutates local state only; no propagation, never fails. Missing
    /// positions are ignored.
    pub fn set_connected(&mut self, pos: Pos, side: Side, connected: bool) {
        if let Some(node) = self.nodes.get_mut(&pos) {
            if connected {
                node.joined.insert(side);
            } else {
                node.joined.remove(side);
            }
        }
    }

    /// Read the local connection flag for one side of one node.
    pub fn is_connected(&self, pos: Pos, side: Side) -> bool {
        self.nodes
            .get(&pos)
            .is_some_and(|n| n.joined.contains(side))
    }

    /// Explicitly disconnect one side of a node. Returns whether the node
    /// exists.
    ///
    /// The severed marker lives on this endpoint only; one blocked endpoint
    /// is enough to fail the symmetric predicate.
    pub fn sever(&mut self, pos: Pos, side: Side) -> bool {
        match self.nodes.get_mut(&pos) {
            Some(node) => {
                node.severed.insert(side);
                true
            }
            None => false,
        }
    }

    /// Undo an explicit disconnect.
    ///
    /// Clears the severed marker on this endpoint AND on the adjacent
    /// node's mutual side: the marker may live on either end, since it is
    /// unknown which endpoint recorded the original disconnect.
    pub fn rejoin(&mut self, pos: Pos, side: Side) {
        if let Some(node) = self.nodes.get_mut(&pos) {
            node.severed.remove(side);
        }
        if let Some(node) = self.nodes.get_mut(&pos.offset(side)) {
            node.severed.remove(side.opposite());
        }
    }

    /// The symmetric can-connect predicate.
    ///
    /// True only if both endpoints exist as real (non-phantom) cables, both
    /// type-acceptance masks approve the pairing on the mutual sides, and
    /// neither endpoint has severed its half of the edge. Evaluated at
    /// refresh time; never re-run while an edge stays active.
    pub fn can_connect(&self, pos: Pos, side: Side) -> bool {
        let Some(a) = self.nodes.get(&pos) else {
            return false;
        };
        let Some(b) = self.nodes.get(&pos.offset(side)) else {
            return false;
        };
        !a.phantom
            && !b.phantom
            && a.accepts.contains(side)
            && b.accepts.contains(side.opposite())
            && !a.severed.contains(side)
            && !b.severed.contains(side.opposite())
    }

    /// Recompute all six connection flags of one node from `can_connect`.
    pub fn refresh(&mut self, pos: Pos) {
        if !self.contains(pos) {
            return;
        }
        for side in Side::ALL {
            let connect = self.can_connect(pos, side);
            self.set_connected(pos, side, connect);
        }
    }

    /// Refresh each of the six adjacent positions.
    ///
    /// Call together with [`refresh`](Self::refresh) after any mutation so
    /// both endpoints of every incident edge agree again.
    pub fn refresh_around(&mut self, pos: Pos) {
        for side in Side::ALL {
            self.refresh(pos.offset(side));
        }
    }

    /// Whether the edge on the given side is active: both endpoints'
    /// mutual flags are set.
    pub fn edge_active(&self, pos: Pos, side: Side) -> bool {
        self.is_connected(pos, side) && self.is_connected(pos.offset(side), side.opposite())
    }

    /// Active-edge neighbours of a position.
    ///
    /// The sole traversal primitive used for network derivation.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = (Side, Pos)> + '_ {
        Side::ALL
            .into_iter()
            .filter(move |side| self.edge_active(pos, *side))
            .map(move |side| (side, pos.offset(side)))
    }

    /// All registered positions, in arbitrary order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}


#[cfg(test)]
mod symmetry {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum GraphOp {
        Insert(Pos, SideSet),
        Remove(Pos),
        Sever(Pos, Side),
        Rejoin(Pos, Side),
        SetPhantom(Pos, bool),
    }

    fn arb_pos() -> impl Strategy<Value = Pos> {
        (0i64..3, 0i64..3, 0i64..3).prop_map(|(x, y, z)| Pos::new(x, y, z))
    }

    fn arb_side() -> impl Strategy<Value = Side> {
        (0usize..6).prop_map(|i| Side::from_index(i).unwrap())
    }

    fn arb_op() -> impl Strategy<Value = GraphOp> {
        prop_oneof![
            (arb_pos(), any::<u8>())
                .prop_map(|(p, bits)| GraphOp::Insert(p, SideSet::ALL.iter()
                    .filter(|s| bits & (1 << s.index()) != 0)
                    .collect())),
            arb_pos().prop_map(GraphOp::Remove),
            (arb_pos(), arb_side()).prop_map(|(p, s)| GraphOp::Sever(p, s)),
            (arb_pos(), arb_side()).prop_map(|(p, s)| GraphOp::Rejoin(p, s)),
            (arb_pos(), any::<bool>()).prop_map(|(p, b)| GraphOp::SetPhantom(p, b)),
        ]
    }

    fn apply(graph: &mut ConnectivityGraph, op: &GraphOp) {
        let pos = match *op {
            GraphOp::Insert(pos, accepts) => {
                graph.insert(pos, accepts);
                pos
            }
            GraphOp::Remove(pos) => {
                graph.remove(pos);
                pos
            }
            GraphOp::Sever(pos, side) => {
                graph.sever(pos, side);
                pos
            }
            GraphOp::Rejoin(pos, side) => {
                graph.rejoin(pos, side);
                pos
            }
            GraphOp::SetPhantom(pos, phantom) => {
                graph.set_phantom(pos, phantom);
                pos
            }
        };
        // Every mutation is followed by the both-sides update requests
        graph.refresh(pos);
        graph.refresh_around(pos);
    }

    proptest! {
        // For all op sequences, connection flags are mutually consistent
        // at quiescence.
        #[test]
        fn flags_symmetric_at_quiescence(ops in prop::collection::vec(arb_op(), 1..40)) {
            let mut graph = ConnectivityGraph::new();
            for op in &ops {
                apply(&mut graph, op);
            }

            let positions: Vec<Pos> = graph.positions().collect();
            for pos in positions {
                for side in Side::ALL {
                    prop_assert_eq!(
                        graph.is_connected(pos, side),
                        graph.is_connected(pos.offset(side), side.opposite()),
                        "asymmetric flags at {} side {}", pos, side
                    );
                }
            }
        }
    }
}
