use thiserror::Error;
use crate::{
    edit::{ Command, History, REPLACE_THRESHOLD },
    graph::{ Diagram, EdgeId, EdgeKind, GraphError, NodeId, NodeKind },
    parse::{ self, ParseError },
    poly::Poly,
    vars::VarRegistry,
};

/// Errors for gestures the editing policy cannot map to a command.
///
/// Structurally invalid gestures (self-loops, wires on saturated W inputs,
/// and the like) are *not* errors: the policy declines them silently. These
/// errors cover genuinely malformed input.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Returned when the text entered on a boundary node is not an integer.
    #[error("invalid qubit index: `{0}`")]
    BadQubitIndex(String),
}
pub type PolicyResult<T> = Result<T, PolicyError>;

/// A change notification emitted synchronously by the [`Editor`] after the
/// change has fully taken effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// The diagram changed (by a new command, an undo, or a redo).
    GraphChanged,
    /// The undo/redo stack changed.
    HistoryChanged,
    /// A phase edit introduced a new variable, or a redo re-introduced one.
    VarAdded(String),
    /// Undoing a phase edit removed the variable it had introduced.
    VarRemoved(String),
}

/// A user-level editing action, before the policy has decided what (if
/// anything) it does to the diagram.
#[derive(Clone, Debug)]
pub enum Gesture {
    /// Click on empty canvas: add a node of the current kind.
    AddNodeAt { x: f64, y: f64 },
    /// Drag from one node to another: add a wire of the current kind.
    Connect { u: NodeId, v: NodeId },
    /// Delete the currently selected nodes and edges.
    DeleteSelection,
    /// Commit text typed on a node: a phase for generators, a qubit index
    /// for boundaries.
    EditNodeText { id: NodeId, text: String },
    /// Pick a node kind in the toolbar; also retypes selected generators.
    SelectNodeKind { kind: NodeKind },
    /// Pick an edge kind in the toolbar; also rekinds the selected wires.
    SelectEdgeKind { kind: EdgeKind },
    /// Drag the given nodes to new positions.
    MoveNodes { targets: Vec<(NodeId, (f64, f64))> },
    /// Copy the current selection to the clipboard.
    Copy,
    /// Paste the clipboard, offset from the original.
    Paste,
}

/// The interactive editing surface: a diagram, its variable registry, an
/// undo/redo [`History`], a selection, and a clipboard.
///
/// All mutation goes through [`apply_gesture`][Self::apply_gesture],
/// [`undo`][Self::undo], and [`redo`][Self::redo], so every change to the
/// diagram is an undoable command and every invariant check lives in one
/// place.
pub struct Editor {
    graph: Diagram,
    vars: VarRegistry,
    history: History,
    cur_node_kind: NodeKind,
    cur_edge_kind: EdgeKind,
    selection: Vec<NodeId>,
    edge_selection: Vec<EdgeId>,
    clipboard: Option<Diagram>,
    listeners: Vec<Box<dyn FnMut(&EditorEvent)>>,
}

impl Default for Editor {
    fn default() -> Self { Self::new() }
}

impl Editor {
    /// Create an editor over an empty diagram.
    pub fn new() -> Self { Self::with_graph(Diagram::new()) }

    /// Create an editor over an existing diagram.
    pub fn with_graph(graph: Diagram) -> Self {
        Self {
            graph,
            vars: VarRegistry::new(),
            history: History::new(),
            cur_node_kind: NodeKind::Z,
            cur_edge_kind: EdgeKind::Plain,
            selection: Vec::new(),
            edge_selection: Vec::new(),
            clipboard: None,
            listeners: Vec::new(),
        }
    }

    /// The diagram being edited.
    pub fn graph(&self) -> &Diagram { &self.graph }

    /// The variable registry.
    pub fn vars(&self) -> &VarRegistry { &self.vars }

    /// The node kind new nodes will take.
    pub fn cur_node_kind(&self) -> NodeKind { self.cur_node_kind }

    /// The edge kind new wires will take.
    pub fn cur_edge_kind(&self) -> EdgeKind { self.cur_edge_kind }

    /// The currently selected node IDs.
    pub fn selection(&self) -> &[NodeId] { &self.selection }

    /// Replace the selection; IDs of missing nodes are dropped.
    pub fn set_selection<I>(&mut self, ids: I)
    where I: IntoIterator<Item = NodeId>
    {
        self.selection = ids.into_iter().collect();
        self.prune_selection();
    }

    /// The currently selected edge IDs.
    pub fn edge_selection(&self) -> &[EdgeId] { &self.edge_selection }

    /// Replace the edge selection; IDs of missing edges are dropped.
    pub fn set_edge_selection<I>(&mut self, ids: I)
    where I: IntoIterator<Item = EdgeId>
    {
        self.edge_selection = ids.into_iter().collect();
        self.prune_selection();
    }

    /// Clear both the node and edge selections.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.edge_selection.clear();
    }

    /// Return `true` if there is anything to undo.
    pub fn can_undo(&self) -> bool { self.history.can_undo() }

    /// Return `true` if there is anything to redo.
    pub fn can_redo(&self) -> bool { self.history.can_redo() }

    /// Toggle whether a registered variable is boolean-valued, returning
    /// `false` if the variable is unknown.
    ///
    /// Not an undoable edit: variable kinds annotate the registry, not the
    /// diagram.
    pub fn set_var_boolean(&mut self, name: &str, boolean: bool) -> bool {
        if !self.vars.contains(name) { return false; }
        self.vars.set_kind(name, boolean);
        true
    }

    /// Register a listener for [`EditorEvent`]s.
    pub fn subscribe<F>(&mut self, listener: F)
    where F: FnMut(&EditorEvent) + 'static
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: EditorEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn prune_selection(&mut self) {
        let graph = &self.graph;
        self.selection.retain(|id| graph.has_node(*id));
        self.edge_selection.retain(|id| graph.has_edge(*id));
    }

    // apply and record a command, then notify
    fn push(&mut self, cmd: Command) -> PolicyResult<()> {
        self.history.push(cmd, &mut self.graph, &mut self.vars)?;
        self.prune_selection();
        self.emit(EditorEvent::GraphChanged);
        self.emit(EditorEvent::HistoryChanged);
        Ok(())
    }

    /// Undo one step, returning `false` if there was nothing to undo.
    ///
    /// Undoing a phase edit that introduced variables emits a `VarRemoved`
    /// for each of them.
    pub fn undo(&mut self) -> PolicyResult<bool> {
        let removed: Vec<String> =
            self.history.last()
            .map(|cmd| cmd.introduced_vars().to_vec())
            .unwrap_or_default();
        let done = self.history.undo(&mut self.graph, &mut self.vars)?;
        if done {
            self.prune_selection();
            self.emit(EditorEvent::GraphChanged);
            self.emit(EditorEvent::HistoryChanged);
            for name in removed.into_iter() {
                self.emit(EditorEvent::VarRemoved(name));
            }
        }
        Ok(done)
    }

    /// Redo one step, returning `false` if there was nothing to redo.
    ///
    /// Redoing a phase edit that introduced variables re-registers them and
    /// emits a `VarAdded` for each, mirroring the original application.
    pub fn redo(&mut self) -> PolicyResult<bool> {
        let added: Vec<String> =
            self.history.next_redo()
            .map(|cmd| cmd.introduced_vars().to_vec())
            .unwrap_or_default();
        let done = self.history.redo(&mut self.graph, &mut self.vars)?;
        if done {
            self.prune_selection();
            self.emit(EditorEvent::GraphChanged);
            self.emit(EditorEvent::HistoryChanged);
            for name in added.into_iter() {
                self.emit(EditorEvent::VarAdded(name));
            }
        }
        Ok(done)
    }

    /// Mark the end of a drag or similar continuous interaction, so later
    /// moves start a fresh undo step.
    pub fn end_interaction(&mut self) { self.history.seal(); }

    // the selection, deduplicated and closed under W pairing
    fn selection_closure(&self) -> Vec<NodeId> {
        let mut closure: Vec<NodeId> = Vec::new();
        for &id in self.selection.iter() {
            if !closure.contains(&id) { closure.push(id); }
            if let Some(partner) = self.graph.w_partner(id) {
                if !closure.contains(&partner) { closure.push(partner); }
            }
        }
        closure
    }

    /// Map a gesture onto a command and apply it.
    ///
    /// Gestures that would violate a structural invariant of the diagram
    /// (self-loops, wires between W partners, third wires on W inputs, a
    /// second wire of a different kind, text on W nodes) are declined:
    /// `Ok(())` with no command recorded. Errors are reserved for malformed
    /// input, such as unparseable phase text.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> PolicyResult<()> {
        match gesture {
            Gesture::AddNodeAt { x, y } => {
                let cmd =
                    if self.cur_node_kind.is_w() {
                        Command::AddWPair { x, y, ids: None, undone: None }
                    } else {
                        Command::AddNode {
                            kind: self.cur_node_kind,
                            x, y,
                            id: None,
                            undone: None,
                        }
                    };
                self.push(cmd)
            },
            Gesture::Connect { u, v } => {
                let ku =
                    self.graph.get_node(u)
                    .ok_or(GraphError::MissingNode(u))?
                    .kind;
                let kv =
                    self.graph.get_node(v)
                    .ok_or(GraphError::MissingNode(v))?
                    .kind;
                if u == v || self.graph.w_partner(u) == Some(v) {
                    return Ok(());
                }
                if self.graph.find_edge(u, v).is_some() {
                    // either a duplicate or a kind clash
                    return Ok(());
                }
                let saturated = |kind: NodeKind, id: NodeId| {
                    kind == NodeKind::WInput
                        && self.graph.arity(id).unwrap_or(0) >= 2
                };
                if saturated(ku, u) || saturated(kv, v) { return Ok(()); }
                self.push(Command::AddEdge {
                    u, v,
                    kind: self.cur_edge_kind,
                    created: None,
                    undone: None,
                })
            },
            Gesture::DeleteSelection => {
                if self.selection.is_empty() && self.edge_selection.is_empty()
                {
                    return Ok(());
                }
                let closure = self.selection_closure();
                let edge_ids: Vec<EdgeId> = self.edge_selection.clone();
                let cmd =
                    if closure.len() > REPLACE_THRESHOLD {
                        let mut replacement = self.graph.clone();
                        replacement.remove_subset(
                            closure.iter().copied(),
                            edge_ids.iter().copied(),
                        )?;
                        Command::ReplaceGraph {
                            graph: replacement,
                            old: None,
                        }
                    } else {
                        Command::RemoveSubset {
                            node_ids: closure,
                            edge_ids,
                            removed: None,
                        }
                    };
                self.selection.clear();
                self.edge_selection.clear();
                self.push(cmd)
            },
            Gesture::EditNodeText { id, text } => {
                let kind =
                    self.graph.get_node(id)
                    .ok_or(GraphError::MissingNode(id))?
                    .kind;
                if kind.is_w() { return Ok(()); }
                if kind.is_boundary() {
                    let trimmed = text.trim();
                    let qubit =
                        if trimmed.is_empty() {
                            None
                        } else {
                            let q =
                                trimmed.parse::<i64>()
                                .map_err(|_| {
                                    PolicyError::BadQubitIndex(text.clone())
                                })?;
                            Some(q)
                        };
                    return self.push(
                        Command::SetQubit { id, qubit, old: None });
                }
                // generators: the text is a phase expression; registration
                // of new variables is deferred to the command so that undo
                // and redo see them too
                let mut introduced: Vec<String> = Vec::new();
                let vars = &mut self.vars;
                let parsed =
                    parse::parse_phase(&text, |name| {
                        if vars.register(name) {
                            introduced.push(name.to_string());
                        }
                        Poly::var(name)
                    });
                let value =
                    match parsed {
                        Ok(value) => value,
                        Err(err) => {
                            for name in introduced.iter() {
                                self.vars.remove(name);
                            }
                            return Err(err.into());
                        },
                    };
                for name in introduced.iter() { self.vars.remove(name); }
                self.push(Command::SetPhase {
                    id,
                    value,
                    introduced: introduced.clone(),
                    old: None,
                })?;
                for name in introduced.into_iter() {
                    self.emit(EditorEvent::VarAdded(name));
                }
                Ok(())
            },
            Gesture::SelectNodeKind { kind } => {
                self.cur_node_kind = kind;
                if !kind.is_generator() { return Ok(()); }
                let targets: Vec<NodeId> =
                    self.selection.iter().copied()
                    .filter(|id| {
                        self.graph.get_node(*id)
                            .is_some_and(|n| {
                                n.kind.is_generator() && n.kind != kind
                            })
                    })
                    .collect();
                if targets.is_empty() { return Ok(()); }
                self.push(Command::SetKind { ids: targets, kind, old: None })
            },
            Gesture::SelectEdgeKind { kind } => {
                self.cur_edge_kind = kind;
                let targets: Vec<EdgeId> =
                    self.edge_selection.iter().copied()
                    .filter(|id| {
                        self.graph.get_edge(*id)
                            .is_some_and(|e| e.kind != kind)
                    })
                    .collect();
                if targets.is_empty() { return Ok(()); }
                self.push(
                    Command::SetEdgeKind { ids: targets, kind, old: None })
            },
            Gesture::MoveNodes { targets } => {
                let mut moves:
                    Vec<(NodeId, (f64, f64), (f64, f64))>
                    = Vec::with_capacity(targets.len());
                for (id, to) in targets.into_iter() {
                    let from =
                        self.graph.get_node(id)
                        .ok_or(GraphError::MissingNode(id))?
                        .pos();
                    if from != to { moves.push((id, from, to)); }
                }
                if moves.is_empty() { return Ok(()); }
                self.push(Command::MoveNodes { moves })
            },
            Gesture::Copy => {
                if self.selection.is_empty() {
                    self.clipboard = None;
                    return Ok(());
                }
                let closure = self.selection_closure();
                self.clipboard = Some(self.graph.subgraph(closure)?);
                Ok(())
            },
            Gesture::Paste => {
                let Some(clip) = self.clipboard.clone() else {
                    return Ok(());
                };
                self.push(Command::MergeGraph {
                    graph: clip,
                    dx: 0.5,
                    dy: 0.5,
                    inserted: None,
                    undone: None,
                })?;
                self.selection =
                    self.history.last()
                    .map(|cmd| cmd.inserted_nodes())
                    .unwrap_or_default();
                Ok(())
            },
        }
    }
}
