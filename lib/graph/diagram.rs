use std::{ fs, io::Write, path::Path };
use rustc_hash::FxHashMap;
use crate::{
    graph::{
        Edge,
        EdgeId,
        EdgeKind,
        GraphResult,
        Node,
        NodeId,
        NodeKind,
    },
    phase::PhaseValue,
};

use crate::graph::GraphError::*;

/// Represents an editable diagram in the ZX(W)-calculus.
///
/// Every node and edge is given a unique index for identification purposes.
/// At most one ordinary wire exists between any two nodes; the pairing edge
/// between a W input and its W output is implicit (part of the node pairing
/// relation) and never stored as an ordinary wire.
///
/// All mutations validate fully before touching any state, so a failed
/// operation leaves the diagram untouched.
#[derive(Clone, Debug)]
pub struct Diagram {
    pub(crate) nodes: Vec<Option<Node>>,
    pub(crate) node_count: usize,
    pub(crate) free_nodes: Vec<NodeId>,
    pub(crate) edges: Vec<Option<Edge>>,
    pub(crate) edge_count: usize,
    pub(crate) free_edges: Vec<EdgeId>,
    pub(crate) wires: Vec<Option<Vec<EdgeId>>>,
    pub(crate) wpairs: FxHashMap<NodeId, NodeId>,
}

impl Default for Diagram {
    fn default() -> Self { Self::new() }
}

impl PartialEq for Diagram {
    /// Equality is semantic: same nodes under the same IDs, same edges under
    /// the same IDs, same W pairing. Free-slot bookkeeping is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.node_count == other.node_count
            && self.edge_count == other.edge_count
            && self.nodes().all(|(id, n)| other.get_node(id) == Some(n))
            && self.edges().all(|(id, e)| other.get_edge(id) == Some(e))
            && self.wpairs == other.wpairs
    }
}

impl Diagram {
    /// Create a new, empty diagram.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_count: 0,
            free_nodes: Vec::new(),
            edges: Vec::new(),
            edge_count: 0,
            free_edges: Vec::new(),
            wires: Vec::new(),
            wpairs: FxHashMap::default(),
        }
    }

    /// Return the number of nodes.
    pub fn count_nodes(&self) -> usize { self.node_count }

    /// Return the number of edges.
    pub fn count_edges(&self) -> usize { self.edge_count }

    /// Return `true` if the diagram has no nodes.
    pub fn is_empty(&self) -> bool { self.node_count == 0 }

    /// Return the number of Z-spiders.
    pub fn count_z(&self) -> usize {
        self.nodes().filter(|(_, n)| n.kind.is_z()).count()
    }

    /// Return the number of X-spiders.
    pub fn count_x(&self) -> usize {
        self.nodes().filter(|(_, n)| n.kind.is_x()).count()
    }

    /// Return the number of H-boxes.
    pub fn count_h(&self) -> usize {
        self.nodes().filter(|(_, n)| n.kind.is_h()).count()
    }

    /// Return the number of boundary nodes.
    pub fn count_boundary(&self) -> usize {
        self.nodes().filter(|(_, n)| n.kind.is_boundary()).count()
    }

    /// Return the number of W pairs.
    pub fn count_w_pairs(&self) -> usize { self.wpairs.len() / 2 }

    /// Return `true` if a node exists with the given ID.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|mb_n| mb_n.is_some())
    }

    /// Get the node associated with a particular ID if it exists.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(|mb_n| mb_n.as_ref())
    }

    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(|mb_n| mb_n.as_mut())
    }

    /// Return `true` if an edge exists with the given ID.
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.get(id).is_some_and(|mb_e| mb_e.is_some())
    }

    /// Get the edge associated with a particular ID if it exists.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id).and_then(|mb_e| mb_e.as_ref())
    }

    /// Get the number of ordinary wires attached to a node, if it exists.
    ///
    /// The implicit W pairing edge is not counted.
    pub fn arity(&self, id: NodeId) -> Option<usize> {
        self.wires.get(id)
            .and_then(|mb_w| mb_w.as_ref().map(|w| w.len()))
    }

    /// Return the W partner of a node, if the node is half of a W pair.
    pub fn w_partner(&self, id: NodeId) -> Option<NodeId> {
        self.wpairs.get(&id).copied()
    }

    /// Find the ordinary wire joining two nodes, if one exists.
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.wires.get(u)
            .and_then(|mb_w| mb_w.as_ref())
            .and_then(|w| {
                w.iter().copied()
                    .find(|eid| {
                        self.get_edge(*eid)
                            .is_some_and(|e| e.joins(u, v))
                    })
            })
    }

    /// Iterate over the IDs of all nodes joined to `id` by an ordinary wire,
    /// if it exists.
    pub fn neighbors(&self, id: NodeId)
        -> Option<impl Iterator<Item = NodeId> + '_>
    {
        self.wires.get(id)
            .and_then(|mb_w| mb_w.as_ref())
            .map(move |w| {
                w.iter()
                    .filter_map(move |eid| {
                        self.get_edge(*eid).and_then(|e| e.other(id))
                    })
            })
    }

    // pop a freed node ID off the list or allocate a new one
    fn fresh_node_id(&mut self) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            self.node_count += 1;
            id
        } else {
            let id = self.nodes.len();
            self.nodes.push(None);
            self.wires.push(None);
            self.node_count += 1;
            id
        }
    }

    // pop a freed edge ID off the list or allocate a new one
    fn fresh_edge_id(&mut self) -> EdgeId {
        if let Some(id) = self.free_edges.pop() {
            self.edge_count += 1;
            id
        } else {
            let id = self.edges.len();
            self.edges.push(None);
            self.edge_count += 1;
            id
        }
    }

    // insert a node without validating its kind; used by add_node, add_w_pair
    // and merge
    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.fresh_node_id();
        let _ = self.nodes[id].insert(node);
        let _ = self.wires[id].insert(Vec::new());
        id
    }

    // insert an edge without validating; callers check the edge rules
    fn push_edge(&mut self, edge: Edge) -> EdgeId {
        let (a, b) = (edge.a, edge.b);
        let id = self.fresh_edge_id();
        let _ = self.edges[id].insert(edge);
        self.wires[a].as_mut()
            .expect("bad book-keeping: missing wire list")
            .push(id);
        self.wires[b].as_mut()
            .expect("bad book-keeping: missing wire list")
            .push(id);
        id
    }

    /// Add a node of the given kind to the diagram and return its ID.
    ///
    /// The phase defaults to zero. Fails with `UnpairedW` for W kinds: W
    /// nodes can only be introduced through
    /// [`add_w_pair`][Self::add_w_pair].
    pub fn add_node(&mut self, kind: NodeKind, x: f64, y: f64)
        -> GraphResult<NodeId>
    {
        if kind.is_w() { return Err(UnpairedW); }
        Ok(self.push_node(Node::new(kind, x, y)))
    }

    /// Atomically add a paired W input and W output and return their IDs as
    /// `(input, output)`.
    ///
    /// The input is placed at `(x, y)` and the output directly above it.
    pub fn add_w_pair(&mut self, x: f64, y: f64) -> (NodeId, NodeId) {
        let win = self.push_node(Node::new(NodeKind::WInput, x, y));
        let wout = self.push_node(Node::new(NodeKind::WOutput, x, y - 1.0));
        self.wpairs.insert(win, wout);
        self.wpairs.insert(wout, win);
        (win, wout)
    }

    /// Add an ordinary wire between two nodes and return its ID.
    ///
    /// Re-adding an existing wire with the same kind is an idempotent no-op
    /// returning the existing ID. Fails when the endpoints coincide, when the
    /// nodes are already joined by a wire of a different kind, when either
    /// endpoint is a W input already carrying two wires, or when the nodes
    /// are a paired W input/output.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, kind: EdgeKind)
        -> GraphResult<EdgeId>
    {
        self.has_node(u).then_some(()).ok_or(MissingNode(u))?;
        self.has_node(v).then_some(()).ok_or(MissingNode(v))?;
        if u == v { return Err(InvalidEdgeLoop(u)); }
        if self.w_partner(u) == Some(v) {
            return Err(InvalidEdgeWPair(u, v));
        }
        if let Some(eid) = self.find_edge(u, v) {
            let existing = self.get_edge(eid).unwrap().kind;
            return if existing == kind {
                Ok(eid)
            } else {
                Err(InvalidEdgeKindClash(u, v))
            };
        }
        for id in [u, v] {
            let node = self.get_node(id).unwrap();
            if node.kind == NodeKind::WInput && self.arity(id).unwrap() >= 2 {
                return Err(InvalidEdgeWArity(id));
            }
        }
        Ok(self.push_edge(Edge::new(u, v, kind)))
    }

    // detach and return an edge; panics if absent
    fn take_edge(&mut self, id: EdgeId) -> Edge {
        let edge =
            self.edges.get_mut(id)
            .and_then(|mb_e| mb_e.take())
            .expect("bad book-keeping: taking missing edge");
        for end in [edge.a, edge.b] {
            self.wires[end].as_mut()
                .expect("bad book-keeping: missing wire list")
                .retain(|eid| *eid != id);
        }
        self.free_edges.push(id);
        self.edge_count -= 1;
        edge
    }

    // detach and return a node; all incident edges must already be gone
    fn take_node(&mut self, id: NodeId) -> Node {
        let node =
            self.nodes.get_mut(id)
            .and_then(|mb_n| mb_n.take())
            .expect("bad book-keeping: taking missing node");
        let wires = self.wires[id].take()
            .expect("bad book-keeping: missing wire list");
        debug_assert!(wires.is_empty());
        self.free_nodes.push(id);
        self.node_count -= 1;
        node
    }

    /// Remove a set of nodes and edges, returning the complete removed
    /// sub-state for later [`restore`][Self::restore].
    ///
    /// Edges incident to a removed node are removed (and captured) as well.
    /// Fails with `DanglingWPartner` if the node set contains half of a W
    /// pair without the other half; the caller is responsible for expanding a
    /// user-requested deletion to the full pair. Validation happens entirely
    /// before any mutation.
    pub fn remove_subset<I, J>(&mut self, node_ids: I, edge_ids: J)
        -> GraphResult<Removed>
    where
        I: IntoIterator<Item = NodeId>,
        J: IntoIterator<Item = EdgeId>,
    {
        let mut rm_nodes: Vec<NodeId> = Vec::new();
        for id in node_ids.into_iter() {
            if !rm_nodes.contains(&id) { rm_nodes.push(id); }
        }
        let mut rm_edges: Vec<EdgeId> = Vec::new();
        for id in edge_ids.into_iter() {
            if !rm_edges.contains(&id) { rm_edges.push(id); }
        }
        for &id in rm_nodes.iter() {
            self.has_node(id).then_some(()).ok_or(MissingNode(id))?;
        }
        for &id in rm_edges.iter() {
            self.has_edge(id).then_some(()).ok_or(MissingEdge(id))?;
        }
        for &id in rm_nodes.iter() {
            if let Some(partner) = self.w_partner(id) {
                if !rm_nodes.contains(&partner) {
                    return Err(DanglingWPartner(id));
                }
            }
        }
        for &id in rm_nodes.iter() {
            for &eid in self.wires[id].as_ref().unwrap().iter() {
                if !rm_edges.contains(&eid) { rm_edges.push(eid); }
            }
        }

        let edges: Vec<(EdgeId, Edge)> =
            rm_edges.into_iter()
            .map(|eid| (eid, self.take_edge(eid)))
            .collect();
        let mut pairs: Vec<(NodeId, NodeId)> = Vec::new();
        for &id in rm_nodes.iter() {
            if let Some(partner) = self.wpairs.remove(&id) {
                self.wpairs.remove(&partner);
                pairs.push((id, partner));
            }
        }
        let nodes: Vec<(NodeId, Node)> =
            rm_nodes.into_iter()
            .map(|id| (id, self.take_node(id)))
            .collect();
        Ok(Removed { nodes, edges, pairs })
    }

    /// Re-insert previously removed sub-state at its original IDs.
    ///
    /// *Panics if any of the IDs are already occupied* -- a `Removed` can
    /// only be restored into the diagram it was removed from, before any
    /// conflicting allocation.
    pub fn restore(&mut self, removed: Removed) {
        let Removed { nodes, edges, pairs } = removed;
        for (id, node) in nodes.into_iter() {
            self.occupy_node(id, node);
        }
        for (a, b) in pairs.into_iter() {
            self.wpairs.insert(a, b);
            self.wpairs.insert(b, a);
        }
        for (id, edge) in edges.into_iter() {
            self.occupy_edge(id, edge);
        }
    }

    // re-occupy a specific node slot
    fn occupy_node(&mut self, id: NodeId, node: Node) {
        if self.nodes.len() <= id {
            self.nodes.resize_with(id + 1, || None);
            self.wires.resize_with(id + 1, || None);
        }
        assert!(
            self.nodes[id].is_none(),
            "bad book-keeping: restoring occupied node slot",
        );
        let _ = self.nodes[id].insert(node);
        let _ = self.wires[id].insert(Vec::new());
        self.free_nodes.retain(|f| *f != id);
        self.node_count += 1;
    }

    // re-occupy a specific edge slot
    fn occupy_edge(&mut self, id: EdgeId, edge: Edge) {
        if self.edges.len() <= id {
            self.edges.resize_with(id + 1, || None);
        }
        assert!(
            self.edges[id].is_none(),
            "bad book-keeping: restoring occupied edge slot",
        );
        let (a, b) = (edge.a, edge.b);
        let _ = self.edges[id].insert(edge);
        self.wires[a].as_mut()
            .expect("bad book-keeping: missing wire list")
            .push(id);
        self.wires[b].as_mut()
            .expect("bad book-keeping: missing wire list")
            .push(id);
        self.free_edges.retain(|f| *f != id);
        self.edge_count += 1;
    }

    /// Set the generator kind of a node, returning the old kind.
    ///
    /// Fails with `UnsupportedForKind` on boundary and W nodes, and with
    /// `UnpairedW` when the target kind is a W kind; both directions of
    /// retyping would break the pairing invariant.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind)
        -> GraphResult<NodeKind>
    {
        if kind.is_w() { return Err(UnpairedW); }
        let node = self.get_node(id).ok_or(MissingNode(id))?;
        if !node.kind.is_generator() {
            return Err(UnsupportedForKind(node.kind));
        }
        let old = node.kind;
        self.get_node_mut(id).unwrap().kind = kind;
        Ok(old)
    }

    /// Set the phase label of a node, returning the old value.
    ///
    /// Fails with `UnsupportedForKind` on boundary and W nodes.
    pub fn set_phase(&mut self, id: NodeId, phase: PhaseValue)
        -> GraphResult<PhaseValue>
    {
        let node = self.get_node(id).ok_or(MissingNode(id))?;
        if !node.kind.is_generator() {
            return Err(UnsupportedForKind(node.kind));
        }
        let node = self.get_node_mut(id).unwrap();
        Ok(std::mem::replace(&mut node.phase, phase))
    }

    /// Set the qubit index of a boundary node, returning the old value.
    ///
    /// Fails with `UnsupportedForKind` on non-boundary nodes.
    pub fn set_qubit(&mut self, id: NodeId, qubit: Option<i64>)
        -> GraphResult<Option<i64>>
    {
        let node = self.get_node(id).ok_or(MissingNode(id))?;
        if !node.kind.is_boundary() {
            return Err(UnsupportedForKind(node.kind));
        }
        let node = self.get_node_mut(id).unwrap();
        Ok(std::mem::replace(&mut node.qubit, qubit))
    }

    /// Set the position of a node, returning the old position.
    pub fn set_pos(&mut self, id: NodeId, x: f64, y: f64)
        -> GraphResult<(f64, f64)>
    {
        let node = self.get_node_mut(id).ok_or(MissingNode(id))?;
        let old = (node.x, node.y);
        node.x = x;
        node.y = y;
        Ok(old)
    }

    /// Set the kind of an edge, returning the old kind.
    pub fn set_edge_kind(&mut self, id: EdgeId, kind: EdgeKind)
        -> GraphResult<EdgeKind>
    {
        let edge =
            self.edges.get_mut(id)
            .and_then(|mb_e| mb_e.as_mut())
            .ok_or(MissingEdge(id))?;
        Ok(std::mem::replace(&mut edge.kind, kind))
    }

    /// Extract the induced subdiagram over exactly the given node IDs and
    /// the edges with both endpoints inside.
    ///
    /// Node IDs in the result are freshly allocated from zero, in the order
    /// given. Fails with `DanglingWPartner` if the set contains half of a W
    /// pair without the other half. `self` is not mutated.
    pub fn subgraph<I>(&self, node_ids: I) -> GraphResult<Diagram>
    where I: IntoIterator<Item = NodeId>
    {
        let mut ids: Vec<NodeId> = Vec::new();
        for id in node_ids.into_iter() {
            if !ids.contains(&id) { ids.push(id); }
        }
        for &id in ids.iter() {
            self.has_node(id).then_some(()).ok_or(MissingNode(id))?;
        }
        for &id in ids.iter() {
            if let Some(partner) = self.w_partner(id) {
                if !ids.contains(&partner) {
                    return Err(DanglingWPartner(id));
                }
            }
        }
        let mut sub = Diagram::new();
        let mut map: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        for &id in ids.iter() {
            let new = sub.push_node(self.get_node(id).unwrap().clone());
            map.insert(id, new);
        }
        for (a, b) in self.w_pairs() {
            if let (Some(&na), Some(&nb)) = (map.get(&a), map.get(&b)) {
                sub.wpairs.insert(na, nb);
                sub.wpairs.insert(nb, na);
            }
        }
        for (_, edge) in self.edges() {
            if let (Some(&na), Some(&nb)) =
                (map.get(&edge.a), map.get(&edge.b))
            {
                sub.push_edge(Edge::new(na, nb, edge.kind));
            }
        }
        Ok(sub)
    }

    /// Insert a translated copy of `other` into `self` with freshly
    /// allocated IDs, returning the new node and edge IDs in insertion
    /// order.
    ///
    /// `other` is never mutated.
    pub fn merge(&mut self, other: &Diagram, dx: f64, dy: f64)
        -> (Vec<NodeId>, Vec<EdgeId>)
    {
        let mut map: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut new_nodes: Vec<NodeId> = Vec::new();
        for (id, node) in other.nodes() {
            let new = self.push_node(node.shifted(dx, dy));
            map.insert(id, new);
            new_nodes.push(new);
        }
        for (a, b) in other.w_pairs() {
            let (na, nb) = (map[&a], map[&b]);
            self.wpairs.insert(na, nb);
            self.wpairs.insert(nb, na);
        }
        let mut new_edges: Vec<EdgeId> = Vec::new();
        for (_, edge) in other.edges() {
            let eid =
                self.push_edge(
                    Edge::new(map[&edge.a], map[&edge.b], edge.kind));
            new_edges.push(eid);
        }
        (new_nodes, new_edges)
    }

    /// Return an iterator over all nodes, visited in ID order.
    ///
    /// The iterator item type is `(`[`NodeId`]`, &`[`Node`]`)`.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { iter: self.nodes.iter().enumerate() }
    }

    /// Return an iterator over all edges, visited in ID order.
    ///
    /// The iterator item type is `(`[`EdgeId`]`, &`[`Edge`]`)`.
    pub fn edges(&self) -> Edges<'_> {
        Edges { iter: self.edges.iter().enumerate() }
    }

    /// Iterate over all W pairs as `(input, output)`, each pair visited
    /// once.
    pub fn w_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.wpairs.iter()
            .filter(|(id, _)| {
                self.get_node(**id)
                    .is_some_and(|n| n.kind == NodeKind::WInput)
            })
            .map(|(id, partner)| (*id, *partner))
    }

    /// Render `self` as a graphviz representation.
    pub fn to_graphviz(&self) -> GraphResult<tabbycat::Graph> {
        use tabbycat::*;
        use tabbycat::Edge as GvEdge;
        use tabbycat::attributes::*;
        use crate::vizdefs::*;
        let mut statements =
            StmtList::new()
            .add_attr(
                AttrType::Node,
                AttrList::new()
                    .add_pair(fontname(FONT))
                    .add_pair(fontsize(FONTSIZE))
                    .add_pair(margin(NODE_MARGIN)),
            );
        for (id, node) in self.nodes() {
            let attrs = node.graph_attrs();
            statements = statements.add_node(id.into(), None, Some(attrs));
        }
        for (_, edge) in self.edges() {
            statements =
                match edge.kind {
                    EdgeKind::Plain =>
                        statements.add_edge(
                            GvEdge::head_node(edge.a.into(), None)
                            .line_to_node(edge.b.into(), None)
                        ),
                    EdgeKind::Hadamard =>
                        statements.add_edge(
                            GvEdge::head_node(edge.a.into(), None)
                            .line_to_node(edge.b.into(), None)
                            .add_attrpair(style(Style::Dashed))
                            .add_attrpair(color(H_WIRE))
                        ),
                };
        }
        for (win, wout) in self.w_pairs() {
            statements =
                statements.add_edge(
                    GvEdge::head_node(win.into(), None)
                    .line_to_node(wout.into(), None)
                    .add_attrpair(style(Style::Dashed))
                );
        }
        let graphviz =
            GraphBuilder::default()
                .graph_type(GraphType::Graph)
                .strict(false)
                .id(Identity::quoted(""))
                .stmts(statements)
                .build()
                .unwrap();
        Ok(graphviz)
    }

    /// Like [`to_graphviz`][Self::to_graphviz], but render directly to a
    /// string and write it to `path`.
    pub fn save_graphviz<P>(&self, path: P) -> GraphResult<()>
    where P: AsRef<Path>
    {
        let graphviz = self.to_graphviz()?;
        fs::OpenOptions::new()
            .write(true)
            .append(false)
            .create(true)
            .truncate(true)
            .open(path)?
            .write_all(format!("{}", graphviz).as_bytes())?;
        Ok(())
    }
}

/// Complete sub-state captured by [`Diagram::remove_subset`], sufficient to
/// [`restore`][Diagram::restore] the removal exactly.
///
/// Never aliases the live diagram; it owns its data outright.
#[derive(Clone, Debug, PartialEq)]
pub struct Removed {
    pub(crate) nodes: Vec<(NodeId, Node)>,
    pub(crate) edges: Vec<(EdgeId, Edge)>,
    pub(crate) pairs: Vec<(NodeId, NodeId)>,
}

impl Removed {
    /// Return `true` if nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Iterate over the removed node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|(id, _)| *id)
    }

    /// Iterate over the removed edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|(id, _)| *id)
    }
}

/// Iterator over all nodes in a diagram, visited in ID order.
///
/// The iterator item type is `(`[`NodeId`]`, &`[`Node`]`)`.
pub struct Nodes<'a> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, Option<Node>>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .find_map(|(id, mb_n)| mb_n.as_ref().map(|n| (id, n)))
    }
}

impl<'a> std::iter::FusedIterator for Nodes<'a> { }

/// Iterator over all edges in a diagram, visited in ID order.
///
/// The iterator item type is `(`[`EdgeId`]`, &`[`Edge`]`)`.
pub struct Edges<'a> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, Option<Edge>>>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = (EdgeId, &'a Edge);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .find_map(|(id, mb_e)| mb_e.as_ref().map(|e| (id, e)))
    }
}

impl<'a> std::iter::FusedIterator for Edges<'a> { }

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::GraphError;
    use crate::phase::Phase;

    fn build_simple() -> (Diagram, Vec<NodeId>) {
        let mut dg = Diagram::new();
        let z = dg.add_node(NodeKind::Z, 0.0, 0.0).unwrap();
        let x = dg.add_node(NodeKind::X, 1.0, 0.0).unwrap();
        let h = dg.add_node(NodeKind::H, 2.0, 0.0).unwrap();
        let b = dg.add_node(NodeKind::Boundary, 3.0, 0.0).unwrap();
        dg.add_edge(z, x, EdgeKind::Plain).unwrap();
        dg.add_edge(x, h, EdgeKind::Hadamard).unwrap();
        dg.add_edge(h, b, EdgeKind::Plain).unwrap();
        (dg, vec![z, x, h, b])
    }

    #[test]
    fn add_counts() {
        let (dg, ids) = build_simple();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(dg.count_nodes(), 4);
        assert_eq!(dg.count_edges(), 3);
        assert_eq!(dg.count_z(), 1);
        assert_eq!(dg.count_x(), 1);
        assert_eq!(dg.count_h(), 1);
        assert_eq!(dg.count_boundary(), 1);
        assert_eq!(dg.arity(1), Some(2));
        assert_eq!(dg.arity(3), Some(1));
    }

    #[test]
    fn no_lone_w() {
        let mut dg = Diagram::new();
        assert!(matches!(
            dg.add_node(NodeKind::WInput, 0.0, 0.0),
            Err(GraphError::UnpairedW),
        ));
        let (win, wout) = dg.add_w_pair(0.0, 0.0);
        assert_eq!(dg.w_partner(win), Some(wout));
        assert_eq!(dg.w_partner(wout), Some(win));
        assert_eq!(dg.count_w_pairs(), 1);
    }

    #[test]
    fn edge_rules() {
        let (mut dg, ids) = build_simple();
        let (z, x) = (ids[0], ids[1]);
        // self-loop
        assert!(matches!(
            dg.add_edge(z, z, EdgeKind::Plain),
            Err(GraphError::InvalidEdgeLoop(_)),
        ));
        // identical kind: idempotent no-op
        let eid = dg.find_edge(z, x).unwrap();
        assert_eq!(dg.add_edge(z, x, EdgeKind::Plain).unwrap(), eid);
        assert_eq!(dg.count_edges(), 3);
        // distinct kind: rejected
        assert!(matches!(
            dg.add_edge(z, x, EdgeKind::Hadamard),
            Err(GraphError::InvalidEdgeKindClash(..)),
        ));
        assert_eq!(dg.count_edges(), 3);
    }

    #[test]
    fn edge_rules_w() {
        let mut dg = Diagram::new();
        let (win, wout) = dg.add_w_pair(0.0, 0.0);
        let z0 = dg.add_node(NodeKind::Z, 1.0, 0.0).unwrap();
        let z1 = dg.add_node(NodeKind::Z, 2.0, 0.0).unwrap();
        let z2 = dg.add_node(NodeKind::Z, 3.0, 0.0).unwrap();
        // no duplicating the implicit pairing edge
        assert!(matches!(
            dg.add_edge(win, wout, EdgeKind::Plain),
            Err(GraphError::InvalidEdgeWPair(..)),
        ));
        // a W input carries at most two ordinary wires
        dg.add_edge(win, z0, EdgeKind::Plain).unwrap();
        dg.add_edge(win, z1, EdgeKind::Plain).unwrap();
        assert!(matches!(
            dg.add_edge(win, z2, EdgeKind::Plain),
            Err(GraphError::InvalidEdgeWArity(_)),
        ));
        // the W output is unrestricted
        dg.add_edge(wout, z2, EdgeKind::Plain).unwrap();
    }

    #[test]
    fn remove_and_restore() {
        let (mut dg, ids) = build_simple();
        let orig = dg.clone();
        let removed =
            dg.remove_subset([ids[1]], None).unwrap();
        assert_eq!(dg.count_nodes(), 3);
        // incident edges go too
        assert_eq!(dg.count_edges(), 1);
        assert_eq!(removed.node_ids().collect::<Vec<_>>(), vec![ids[1]]);
        assert_eq!(removed.edge_ids().count(), 2);
        dg.restore(removed);
        assert_eq!(dg, orig);
    }

    #[test]
    fn remove_w_closure() {
        let mut dg = Diagram::new();
        let (win, wout) = dg.add_w_pair(0.0, 0.0);
        let z = dg.add_node(NodeKind::Z, 1.0, 0.0).unwrap();
        dg.add_edge(win, z, EdgeKind::Plain).unwrap();
        let orig = dg.clone();
        assert!(matches!(
            dg.remove_subset([win], None),
            Err(GraphError::DanglingWPartner(_)),
        ));
        assert_eq!(dg, orig);
        let removed = dg.remove_subset([win, wout], None).unwrap();
        assert_eq!(dg.count_nodes(), 1);
        assert_eq!(dg.count_w_pairs(), 0);
        dg.restore(removed);
        assert_eq!(dg, orig);
        assert_eq!(dg.w_partner(win), Some(wout));
    }

    #[test]
    fn attr_rules() {
        let mut dg = Diagram::new();
        let z = dg.add_node(NodeKind::Z, 0.0, 0.0).unwrap();
        let b = dg.add_node(NodeKind::Boundary, 1.0, 0.0).unwrap();
        let (win, _) = dg.add_w_pair(2.0, 0.0);

        assert_eq!(dg.set_kind(z, NodeKind::X).unwrap(), NodeKind::Z);
        assert!(matches!(
            dg.set_kind(b, NodeKind::Z),
            Err(GraphError::UnsupportedForKind(NodeKind::Boundary)),
        ));
        assert!(matches!(
            dg.set_kind(z, NodeKind::WInput),
            Err(GraphError::UnpairedW),
        ));
        assert!(matches!(
            dg.set_phase(win, Phase::pi().into()),
            Err(GraphError::UnsupportedForKind(NodeKind::WInput)),
        ));
        dg.set_phase(z, Phase::pi().into()).unwrap();
        assert_eq!(
            dg.get_node(z).unwrap().phase,
            PhaseValue::Exact(Phase::pi()),
        );

        assert_eq!(dg.set_qubit(b, Some(2)).unwrap(), None);
        assert_eq!(dg.set_qubit(b, Some(3)).unwrap(), Some(2));
        assert!(matches!(
            dg.set_qubit(z, Some(0)),
            Err(GraphError::UnsupportedForKind(_)),
        ));

        assert_eq!(dg.set_pos(z, 5.0, 6.0).unwrap(), (0.0, 0.0));
        assert_eq!(dg.get_node(z).unwrap().pos(), (5.0, 6.0));
    }

    #[test]
    fn subgraph_induced() {
        let (dg, ids) = build_simple();
        let sub = dg.subgraph([ids[0], ids[1]]).unwrap();
        assert_eq!(sub.count_nodes(), 2);
        assert_eq!(sub.count_edges(), 1);
        assert_eq!(sub.get_node(0).unwrap().kind, NodeKind::Z);
        assert_eq!(sub.get_node(1).unwrap().kind, NodeKind::X);
        // original untouched
        assert_eq!(dg.count_nodes(), 4);
        assert_eq!(dg.count_edges(), 3);

        let mut dgw = Diagram::new();
        let (win, _) = dgw.add_w_pair(0.0, 0.0);
        assert!(matches!(
            dgw.subgraph([win]),
            Err(GraphError::DanglingWPartner(_)),
        ));
    }

    #[test]
    fn merge_translated() {
        let (mut dg, _) = build_simple();
        let (sub, _) = build_simple();
        let before = sub.clone();
        let (new_nodes, new_edges) = dg.merge(&sub, 0.5, 0.5);
        assert_eq!(sub, before);
        assert_eq!(new_nodes, vec![4, 5, 6, 7]);
        assert_eq!(new_edges.len(), 3);
        assert_eq!(dg.count_nodes(), 8);
        assert_eq!(dg.count_edges(), 6);
        let z_new = dg.get_node(new_nodes[0]).unwrap();
        assert_eq!(z_new.pos(), (0.5, 0.5));
        assert_eq!(z_new.kind, NodeKind::Z);
    }

    #[test]
    fn merge_w_pairs() {
        let mut src = Diagram::new();
        src.add_w_pair(0.0, 0.0);
        let mut dg = Diagram::new();
        dg.add_node(NodeKind::Z, 0.0, 0.0).unwrap();
        let (new_nodes, _) = dg.merge(&src, 1.0, 1.0);
        assert_eq!(new_nodes.len(), 2);
        assert_eq!(dg.w_partner(new_nodes[0]), Some(new_nodes[1]));
        assert_eq!(dg.count_w_pairs(), 1);
    }

    #[test]
    fn id_reuse() {
        let (mut dg, ids) = build_simple();
        let _ = dg.remove_subset([ids[3]], None).unwrap();
        let new = dg.add_node(NodeKind::Z, 0.0, 0.0).unwrap();
        assert_eq!(new, ids[3]);
    }
}
