use rustc_hash::FxHashSet;
use crate::{
    graph::{
        Diagram,
        EdgeId,
        EdgeKind,
        GraphResult,
        NodeId,
        NodeKind,
        Removed,
    },
    phase::PhaseValue,
    vars::VarRegistry,
};

use crate::graph::GraphError::*;

/// A single reversible edit.
///
/// Applying a command mutates the diagram (and, for phase edits, the variable
/// registry) and captures inside the command whatever state is needed to
/// invert it exactly. Inverting and re-applying reproduces the original
/// node and edge IDs: removals are restored from captured sub-state rather
/// than re-allocated.
///
/// Apply and invert calls must alternate, starting with apply; calling either
/// out of order is a defect and panics.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Add a single non-W node with zero phase.
    AddNode {
        kind: NodeKind,
        x: f64,
        y: f64,
        id: Option<NodeId>,
        undone: Option<Removed>,
    },
    /// Add a paired W input and W output.
    AddWPair {
        x: f64,
        y: f64,
        ids: Option<(NodeId, NodeId)>,
        undone: Option<Removed>,
    },
    /// Add an ordinary wire between two nodes.
    ///
    /// A no-op if the wire already exists with the same kind; `created`
    /// records whether this command actually created anything, so inverting
    /// the no-op removes nothing.
    AddEdge {
        u: NodeId,
        v: NodeId,
        kind: EdgeKind,
        created: Option<EdgeId>,
        undone: Option<Removed>,
    },
    /// Remove a set of nodes and edges, plus all edges incident to the
    /// removed nodes.
    ///
    /// `node_ids` must contain W nodes in whole pairs.
    RemoveSubset {
        node_ids: Vec<NodeId>,
        edge_ids: Vec<EdgeId>,
        removed: Option<Removed>,
    },
    /// Retype a set of generator nodes.
    SetKind {
        ids: Vec<NodeId>,
        kind: NodeKind,
        old: Option<Vec<(NodeId, NodeKind)>>,
    },
    /// Rekind a set of edges.
    SetEdgeKind {
        ids: Vec<EdgeId>,
        kind: EdgeKind,
        old: Option<Vec<(EdgeId, EdgeKind)>>,
    },
    /// Set the phase label of a generator node.
    ///
    /// `introduced` lists the variable names this edit adds to the registry;
    /// inverting unregisters them again.
    SetPhase {
        id: NodeId,
        value: PhaseValue,
        introduced: Vec<String>,
        old: Option<PhaseValue>,
    },
    /// Set the qubit index of a boundary node.
    SetQubit {
        id: NodeId,
        qubit: Option<i64>,
        old: Option<Option<i64>>,
    },
    /// Move a set of nodes; each entry is `(id, from, to)`.
    ///
    /// The only coalescable command: see [`Command::merge`].
    MoveNodes {
        moves: Vec<(NodeId, (f64, f64), (f64, f64))>,
    },
    /// Swap in a whole new diagram.
    ReplaceGraph {
        graph: Diagram,
        old: Option<Diagram>,
    },
    /// Insert a translated copy of another diagram under fresh IDs.
    MergeGraph {
        graph: Diagram,
        dx: f64,
        dy: f64,
        inserted: Option<(Vec<NodeId>, Vec<EdgeId>)>,
        undone: Option<Removed>,
    },
}

impl Command {
    /// Apply `self` to a diagram, capturing the state needed to invert.
    ///
    /// Failure leaves the diagram untouched.
    pub fn apply(&mut self, g: &mut Diagram, vars: &mut VarRegistry)
        -> GraphResult<()>
    {
        match self {
            Self::AddNode { kind, x, y, id, undone } => {
                if let Some(rem) = undone.take() {
                    g.restore(rem);
                } else {
                    *id = Some(g.add_node(*kind, *x, *y)?);
                }
                Ok(())
            },
            Self::AddWPair { x, y, ids, undone } => {
                if let Some(rem) = undone.take() {
                    g.restore(rem);
                } else {
                    *ids = Some(g.add_w_pair(*x, *y));
                }
                Ok(())
            },
            Self::AddEdge { u, v, kind, created, undone } => {
                if let Some(rem) = undone.take() {
                    g.restore(rem);
                } else if g.find_edge(*u, *v).is_some() {
                    g.add_edge(*u, *v, *kind)?;
                } else {
                    *created = Some(g.add_edge(*u, *v, *kind)?);
                }
                Ok(())
            },
            Self::RemoveSubset { node_ids, edge_ids, removed } => {
                let rem =
                    g.remove_subset(
                        node_ids.iter().copied(),
                        edge_ids.iter().copied(),
                    )?;
                *removed = Some(rem);
                Ok(())
            },
            Self::SetKind { ids, kind, old } => {
                if kind.is_w() { return Err(UnpairedW); }
                for &id in ids.iter() {
                    let node = g.get_node(id).ok_or(MissingNode(id))?;
                    if !node.kind.is_generator() {
                        return Err(UnsupportedForKind(node.kind));
                    }
                }
                let mut prev: Vec<(NodeId, NodeKind)> =
                    Vec::with_capacity(ids.len());
                for &id in ids.iter() {
                    prev.push((id, g.set_kind(id, *kind)?));
                }
                *old = Some(prev);
                Ok(())
            },
            Self::SetEdgeKind { ids, kind, old } => {
                for &id in ids.iter() {
                    g.has_edge(id).then_some(()).ok_or(MissingEdge(id))?;
                }
                let mut prev: Vec<(EdgeId, EdgeKind)> =
                    Vec::with_capacity(ids.len());
                for &id in ids.iter() {
                    prev.push((id, g.set_edge_kind(id, *kind)?));
                }
                *old = Some(prev);
                Ok(())
            },
            Self::SetPhase { id, value, introduced, old } => {
                let node = g.get_node(*id).ok_or(MissingNode(*id))?;
                if !node.kind.is_generator() {
                    return Err(UnsupportedForKind(node.kind));
                }
                for name in introduced.iter() {
                    vars.register(name.clone());
                }
                *old = Some(g.set_phase(*id, value.clone())?);
                Ok(())
            },
            Self::SetQubit { id, qubit, old } => {
                *old = Some(g.set_qubit(*id, *qubit)?);
                Ok(())
            },
            Self::MoveNodes { moves } => {
                for (id, ..) in moves.iter() {
                    g.has_node(*id).then_some(()).ok_or(MissingNode(*id))?;
                }
                for (id, _, to) in moves.iter() {
                    g.set_pos(*id, to.0, to.1)?;
                }
                Ok(())
            },
            Self::ReplaceGraph { graph, old } => {
                *old = Some(std::mem::replace(g, graph.clone()));
                Ok(())
            },
            Self::MergeGraph { graph, dx, dy, inserted, undone } => {
                if let Some(rem) = undone.take() {
                    g.restore(rem);
                } else {
                    *inserted = Some(g.merge(graph, *dx, *dy));
                }
                Ok(())
            },
        }
    }

    /// Invert a previously applied `self`, restoring the diagram (and
    /// registry) to its state before the apply, IDs included.
    pub fn invert(&mut self, g: &mut Diagram, vars: &mut VarRegistry)
        -> GraphResult<()>
    {
        const UNAPPLIED: &str =
            "bad book-keeping: inverting an unapplied command";
        match self {
            Self::AddNode { id, undone, .. } => {
                let nid = (*id).expect(UNAPPLIED);
                *undone = Some(g.remove_subset([nid], None)?);
                Ok(())
            },
            Self::AddWPair { ids, undone, .. } => {
                let (win, wout) = (*ids).expect(UNAPPLIED);
                *undone = Some(g.remove_subset([win, wout], None)?);
                Ok(())
            },
            Self::AddEdge { created, undone, .. } => {
                if let Some(eid) = *created {
                    *undone = Some(g.remove_subset(None, [eid])?);
                }
                Ok(())
            },
            Self::RemoveSubset { removed, .. } => {
                g.restore(removed.take().expect(UNAPPLIED));
                Ok(())
            },
            Self::SetKind { old, .. } => {
                let prev = old.take().expect(UNAPPLIED);
                for (id, kind) in prev.into_iter().rev() {
                    g.set_kind(id, kind)?;
                }
                Ok(())
            },
            Self::SetEdgeKind { old, .. } => {
                let prev = old.take().expect(UNAPPLIED);
                for (id, kind) in prev.into_iter().rev() {
                    g.set_edge_kind(id, kind)?;
                }
                Ok(())
            },
            Self::SetPhase { id, introduced, old, .. } => {
                let prev = old.take().expect(UNAPPLIED);
                g.set_phase(*id, prev)?;
                for name in introduced.iter() {
                    vars.remove(name);
                }
                Ok(())
            },
            Self::SetQubit { id, old, .. } => {
                let prev = old.take().expect(UNAPPLIED);
                g.set_qubit(*id, prev)?;
                Ok(())
            },
            Self::MoveNodes { moves } => {
                for (id, ..) in moves.iter() {
                    g.has_node(*id).then_some(()).ok_or(MissingNode(*id))?;
                }
                for (id, from, _) in moves.iter() {
                    g.set_pos(*id, from.0, from.1)?;
                }
                Ok(())
            },
            Self::ReplaceGraph { old, .. } => {
                *g = old.take().expect(UNAPPLIED);
                Ok(())
            },
            Self::MergeGraph { inserted, undone, .. } => {
                let (nodes, edges) = inserted.as_ref().expect(UNAPPLIED);
                *undone =
                    Some(g.remove_subset(
                        nodes.iter().copied(),
                        edges.iter().copied(),
                    )?);
                Ok(())
            },
        }
    }

    /// The node IDs inserted by the most recent apply, for `AddNode`,
    /// `AddWPair`, and `MergeGraph`.
    pub fn inserted_nodes(&self) -> Vec<NodeId> {
        match self {
            Self::AddNode { id, .. } => id.iter().copied().collect(),
            Self::AddWPair { ids, .. } =>
                ids.map(|(a, b)| vec![a, b]).unwrap_or_default(),
            Self::MergeGraph { inserted, .. } =>
                inserted.as_ref()
                    .map(|(nodes, _)| nodes.clone())
                    .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// The variable names this command adds to the registry when applied
    /// and removes again when inverted; empty for everything but `SetPhase`.
    pub fn introduced_vars(&self) -> &[String] {
        match self {
            Self::SetPhase { introduced, .. } => introduced,
            _ => &[],
        }
    }

    /// Return `true` if `other` can be coalesced into `self`: both are
    /// `MoveNodes` over the same node set.
    pub fn can_merge(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MoveNodes { moves: a }, Self::MoveNodes { moves: b }) => {
                a.len() == b.len()
                    && a.iter().map(|(id, ..)| *id)
                        .collect::<FxHashSet<NodeId>>()
                    == b.iter().map(|(id, ..)| *id).collect()
            },
            _ => false,
        }
    }

    /// Coalesce a newer move into `self`, keeping `self`'s starting
    /// positions and taking `other`'s targets.
    ///
    /// A no-op unless [`can_merge`][Self::can_merge] holds.
    pub fn merge(&mut self, other: Self) {
        if let (Self::MoveNodes { moves }, Self::MoveNodes { moves: newer })
            = (self, other)
        {
            for (id, _, to) in moves.iter_mut() {
                if let Some((.., nto))
                    = newer.iter().find(|(nid, ..)| nid == id)
                {
                    *to = *nto;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::phase::Phase;

    fn setup() -> (Diagram, VarRegistry, Vec<NodeId>) {
        let mut dg = Diagram::new();
        let z = dg.add_node(NodeKind::Z, 0.0, 0.0).unwrap();
        let x = dg.add_node(NodeKind::X, 1.0, 0.0).unwrap();
        dg.add_edge(z, x, EdgeKind::Plain).unwrap();
        (dg, VarRegistry::new(), vec![z, x])
    }

    #[test]
    fn add_node_round_trip() {
        let (mut dg, mut vars, _) = setup();
        let orig = dg.clone();
        let mut cmd =
            Command::AddNode {
                kind: NodeKind::H,
                x: 2.0,
                y: 0.0,
                id: None,
                undone: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        let applied = dg.clone();
        let id = cmd.inserted_nodes()[0];
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, applied);
        assert_eq!(cmd.inserted_nodes(), vec![id]);
    }

    #[test]
    fn add_w_pair_round_trip() {
        let (mut dg, mut vars, _) = setup();
        let orig = dg.clone();
        let mut cmd =
            Command::AddWPair { x: 3.0, y: 0.0, ids: None, undone: None };
        cmd.apply(&mut dg, &mut vars).unwrap();
        let applied = dg.clone();
        assert_eq!(dg.count_w_pairs(), 1);
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, applied);
    }

    #[test]
    fn add_edge_noop_inverts_to_noop() {
        let (mut dg, mut vars, ids) = setup();
        let orig = dg.clone();
        // the wire already exists with the same kind
        let mut cmd =
            Command::AddEdge {
                u: ids[0],
                v: ids[1],
                kind: EdgeKind::Plain,
                created: None,
                undone: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
    }

    #[test]
    fn remove_subset_round_trip() {
        let (mut dg, mut vars, ids) = setup();
        let orig = dg.clone();
        let mut cmd =
            Command::RemoveSubset {
                node_ids: vec![ids[0]],
                edge_ids: vec![],
                removed: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg.count_nodes(), 1);
        assert_eq!(dg.count_edges(), 0);
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
    }

    #[test]
    fn set_kind_round_trip() {
        let (mut dg, mut vars, ids) = setup();
        let mut cmd =
            Command::SetKind {
                ids: ids.clone(),
                kind: NodeKind::Z,
                old: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg.count_z(), 2);
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg.get_node(ids[1]).unwrap().kind, NodeKind::X);
    }

    #[test]
    fn set_phase_registers_vars() {
        let (mut dg, mut vars, ids) = setup();
        let value: PhaseValue = crate::poly::Poly::var("a").into();
        let mut cmd =
            Command::SetPhase {
                id: ids[0],
                value,
                introduced: vec!["a".to_string()],
                old: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert!(vars.contains("a"));
        assert!(dg.get_node(ids[0]).unwrap().phase.is_symbolic());
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert!(!vars.contains("a"));
        assert_eq!(dg.get_node(ids[0]).unwrap().phase, PhaseValue::zero());
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert!(vars.contains("a"));
    }

    #[test]
    fn set_phase_rejects_boundary() {
        let (mut dg, mut vars, _) = setup();
        let b = dg.add_node(NodeKind::Boundary, 5.0, 0.0).unwrap();
        let mut cmd =
            Command::SetPhase {
                id: b,
                value: Phase::pi().into(),
                introduced: vec![],
                old: None,
            };
        assert!(cmd.apply(&mut dg, &mut vars).is_err());
    }

    #[test]
    fn replace_graph_round_trip() {
        let (mut dg, mut vars, _) = setup();
        let orig = dg.clone();
        let mut cmd =
            Command::ReplaceGraph { graph: Diagram::new(), old: None };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert!(dg.is_empty());
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert!(dg.is_empty());
    }

    #[test]
    fn merge_graph_round_trip() {
        let (mut dg, mut vars, _) = setup();
        let (src, _, _) = setup();
        let orig = dg.clone();
        let mut cmd =
            Command::MergeGraph {
                graph: src,
                dx: 0.5,
                dy: 0.5,
                inserted: None,
                undone: None,
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        let applied = dg.clone();
        let new_nodes = cmd.inserted_nodes();
        assert_eq!(dg.count_nodes(), 4);
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, orig);
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg, applied);
        assert_eq!(cmd.inserted_nodes(), new_nodes);
    }

    #[test]
    fn move_merge() {
        let mut a =
            Command::MoveNodes {
                moves: vec![(0, (0.0, 0.0), (1.0, 0.0))],
            };
        let b =
            Command::MoveNodes {
                moves: vec![(0, (1.0, 0.0), (2.0, 0.0))],
            };
        let c =
            Command::MoveNodes {
                moves: vec![(1, (0.0, 0.0), (1.0, 1.0))],
            };
        assert!(a.can_merge(&b));
        assert!(!a.can_merge(&c));
        a.merge(b);
        let Command::MoveNodes { moves } = &a else { unreachable!() };
        assert_eq!(moves[0], (0, (0.0, 0.0), (2.0, 0.0)));
    }

    #[test]
    fn move_round_trip() {
        let (mut dg, mut vars, ids) = setup();
        let mut cmd =
            Command::MoveNodes {
                moves: vec![(ids[0], (0.0, 0.0), (4.0, 5.0))],
            };
        cmd.apply(&mut dg, &mut vars).unwrap();
        assert_eq!(dg.get_node(ids[0]).unwrap().pos(), (4.0, 5.0));
        cmd.invert(&mut dg, &mut vars).unwrap();
        assert_eq!(dg.get_node(ids[0]).unwrap().pos(), (0.0, 0.0));
    }
}
