//! This package implements the document model behind an interactive editor
//! for diagrams in the [ZX(W)-calculus][wiki]: a labeled multigraph of
//! spiders, H-boxes, boundaries, and paired W nodes, together with the
//! machinery to edit it transactionally.
//!
//! - [`phase`] and [`poly`] provide phase labels, either numerically exact
//! rational multiples of a full turn or polynomials over named variables.
//! - [`parse`] turns user-entered phase text into those labels.
//! - [`vars`] tracks the variables introduced by symbolic phases.
//! - [`graph`] is the diagram model proper, enforcing the structural
//! invariants of the calculus (W pairing, wire multiplicity, arity limits).
//! - [`edit`] layers reversible commands, an undo/redo history, and the
//! gesture-level editing policy on top.
//!
//! [wiki]: https://en.wikipedia.org/wiki/ZX-calculus
//!
//! # See also
//! - [ZXLive](https://github.com/zxcalc/zxlive): an interactive proof
//! assistant for the ZX-calculus.
//! - [PyZX](https://github.com/Quantomatic/pyzx): a Python implementation of
//! the ZX-calculus and its rewrite rules.
//!
//! # Further reading
//! - B. Coecke, "Basic ZX-calculus for students and professionals."
//! [arXiv:2303.03163](https://arxiv.org/abs/2303.03163)
//! - J. van de Wetering, "ZX-calculus for the working quantum computer
//! scientist." [arXiv:2012.13966](https://arxiv.org/abs/2012.13966)

pub mod phase;
pub mod poly;
pub mod parse;
pub mod vars;
pub mod graph;
pub mod edit;
pub(crate) mod vizdefs;

pub extern crate num_complex;
