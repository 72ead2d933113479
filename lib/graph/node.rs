use crate::phase::PhaseValue;
use super::NodeId;

/// The generator kind of a single node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A Z-spider.
    Z,
    /// An X-spider.
    X,
    /// An H-box.
    H,
    /// Termination of a wire at the diagram boundary.
    Boundary,
    /// The input leg of a W node; always paired with a [`WOutput`][Self::WOutput].
    WInput,
    /// The output leg of a W node; always paired with a [`WInput`][Self::WInput].
    WOutput,
}

impl NodeKind {
    /// Return `true` if `self` is `Z`.
    pub fn is_z(&self) -> bool { matches!(self, Self::Z) }

    /// Return `true` if `self` is `X`.
    pub fn is_x(&self) -> bool { matches!(self, Self::X) }

    /// Return `true` if `self` is `H`.
    pub fn is_h(&self) -> bool { matches!(self, Self::H) }

    /// Return `true` if `self` is `Boundary`.
    pub fn is_boundary(&self) -> bool { matches!(self, Self::Boundary) }

    /// Return `true` if `self` is either half of a W pair.
    pub fn is_w(&self) -> bool {
        matches!(self, Self::WInput | Self::WOutput)
    }

    /// Return `true` if `self` is a phase-carrying generator (Z, X, or H).
    ///
    /// Only these kinds admit phase edits and retyping; boundary and W nodes
    /// are structural.
    pub fn is_generator(&self) -> bool {
        matches!(self, Self::Z | Self::X | Self::H)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Z => write!(f, "Z"),
            Self::X => write!(f, "X"),
            Self::H => write!(f, "H"),
            Self::Boundary => write!(f, "boundary"),
            Self::WInput => write!(f, "W-input"),
            Self::WOutput => write!(f, "W-output"),
        }
    }
}

/// A single node in a diagram and its data.
///
/// `phase` is meaningful only for generator kinds; `qubit` only for boundary
/// nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// The generator kind.
    pub kind: NodeKind,
    /// The phase label; defaults to exact zero.
    pub phase: PhaseValue,
    /// Horizontal position on the canvas.
    pub x: f64,
    /// Vertical position on the canvas.
    pub y: f64,
    /// Qubit index, for boundary nodes.
    pub qubit: Option<i64>,
}

impl Node {
    /// Create a new node of the given kind with zero phase and no qubit
    /// index.
    pub fn new(kind: NodeKind, x: f64, y: f64) -> Self {
        Self { kind, phase: PhaseValue::zero(), x, y, qubit: None }
    }

    /// Return `true` if the node is either half of a W pair.
    pub fn is_w(&self) -> bool { self.kind.is_w() }

    /// Return `true` if the node is a phase-carrying generator.
    pub fn is_generator(&self) -> bool { self.kind.is_generator() }

    /// Return the position as a pair.
    pub fn pos(&self) -> (f64, f64) { (self.x, self.y) }

    /// Return a copy of `self` translated by `(dx, dy)`.
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..self.clone() }
    }

    pub(crate) fn graph_attrs(&self) -> tabbycat::AttrList {
        use tabbycat::*;
        use tabbycat::attributes::*;
        use crate::vizdefs::*;
        match self.kind {
            NodeKind::Z => {
                AttrList::new()
                    .add_pair(label(self.phase.label()))
                    .add_pair(shape(Shape::Circle))
                    .add_pair(height(CIRCLE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(Z_COLOR))
            },
            NodeKind::X => {
                AttrList::new()
                    .add_pair(label(self.phase.label()))
                    .add_pair(shape(Shape::Circle))
                    .add_pair(height(CIRCLE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(X_COLOR))
            },
            NodeKind::H => {
                AttrList::new()
                    .add_pair(label(self.phase.label()))
                    .add_pair(shape(Shape::Square))
                    .add_pair(height(SQUARE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(H_COLOR))
            },
            NodeKind::Boundary => {
                let qubit_label =
                    self.qubit
                    .map(|q| format!("q{}", q))
                    .unwrap_or_default();
                AttrList::new()
                    .add_pair(label(qubit_label))
                    .add_pair(shape(Shape::Plaintext))
            },
            NodeKind::WInput => {
                AttrList::new()
                    .add_pair(label("w".to_string()))
                    .add_pair(shape(Shape::Square))
                    .add_pair(height(SQUARE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(W_COLOR))
            },
            NodeKind::WOutput => {
                AttrList::new()
                    .add_pair(label("W".to_string()))
                    .add_pair(shape(Shape::Square))
                    .add_pair(height(SQUARE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(W_COLOR))
            },
        }
    }
}

/// The connection kind of a single edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// An ordinary wire.
    Plain,
    /// A Hadamard wire.
    Hadamard,
}

impl EdgeKind {
    /// Return `true` if `self` is `Plain`.
    pub fn is_plain(&self) -> bool { matches!(self, Self::Plain) }

    /// Return `true` if `self` is `Hadamard`.
    pub fn is_h(&self) -> bool { matches!(self, Self::Hadamard) }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Hadamard => write!(f, "Hadamard"),
        }
    }
}

/// A single edge in a diagram: an unordered pair of distinct node IDs and a
/// connection kind.
///
/// The implicit pairing edge between a W input and its W output is *not*
/// stored as an `Edge`; see [`Diagram::w_pairs`][super::Diagram::w_pairs].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    /// One endpoint.
    pub a: NodeId,
    /// The other endpoint.
    pub b: NodeId,
    /// The connection kind.
    pub kind: EdgeKind,
}

impl Edge {
    /// Create a new edge.
    pub fn new(a: NodeId, b: NodeId, kind: EdgeKind) -> Self {
        Self { a, b, kind }
    }

    /// Return `true` if the edge has an endpoint at `n`.
    pub fn touches(&self, n: NodeId) -> bool { self.a == n || self.b == n }

    /// Return `true` if the edge joins `u` and `v` in either order.
    pub fn joins(&self, u: NodeId, v: NodeId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }

    /// Return the endpoint opposite `n`, if `n` is an endpoint.
    pub fn other(&self, n: NodeId) -> Option<NodeId> {
        if self.a == n {
            Some(self.b)
        } else if self.b == n {
            Some(self.a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds() {
        assert!(NodeKind::Z.is_generator());
        assert!(NodeKind::H.is_generator());
        assert!(!NodeKind::Boundary.is_generator());
        assert!(!NodeKind::WInput.is_generator());
        assert!(NodeKind::WInput.is_w());
        assert!(NodeKind::WOutput.is_w());
        assert!(!NodeKind::Z.is_w());
    }

    #[test]
    fn edge_ends() {
        let e = Edge::new(3, 7, EdgeKind::Plain);
        assert!(e.joins(3, 7));
        assert!(e.joins(7, 3));
        assert!(!e.joins(3, 4));
        assert_eq!(e.other(3), Some(7));
        assert_eq!(e.other(7), Some(3));
        assert_eq!(e.other(5), None);
        assert!(e.touches(3) && e.touches(7) && !e.touches(0));
    }
}
