use std::time::{ Duration, Instant };
use crate::{
    edit::Command,
    graph::{ Diagram, GraphResult },
    vars::VarRegistry,
};

/// Consecutive moves of the same node set closer together in time than this
/// coalesce into a single undo step.
pub const COALESCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
struct Entry {
    cmd: Command,
    stamp: Instant,
    sealed: bool,
}

/// A linear undo/redo stack over [`Command`]s.
///
/// The history owns every command ever pushed (up to redo-tail truncation)
/// along with the diffs they captured; undo and redo replay them against the
/// caller's diagram and variable registry. Pushing while undone commands
/// remain discards the redo tail.
///
/// Consecutive [`MoveNodes`][Command::MoveNodes] commands over the same node
/// set coalesce into the most recent entry when they arrive within
/// [`COALESCE_WINDOW`] of it and the entry has not been
/// [`seal`][Self::seal]ed, so a continuous drag undoes in one step.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<Entry>,
    cursor: usize,
}

impl History {
    /// Create a new, empty history.
    pub fn new() -> Self {
        Self { entries: Vec::new(), cursor: 0 }
    }

    /// Return `true` if there is anything to undo.
    pub fn can_undo(&self) -> bool { self.cursor > 0 }

    /// Return `true` if there is anything to redo.
    pub fn can_redo(&self) -> bool { self.cursor < self.entries.len() }

    /// The number of undoable steps.
    pub fn undo_depth(&self) -> usize { self.cursor }

    /// The number of redoable steps.
    pub fn redo_depth(&self) -> usize { self.entries.len() - self.cursor }

    /// The most recently applied command, if any.
    pub fn last(&self) -> Option<&Command> {
        self.cursor.checked_sub(1)
            .map(|k| &self.entries[k].cmd)
    }

    /// The command the next [`redo`][Self::redo] would re-apply, if any.
    pub fn next_redo(&self) -> Option<&Command> {
        self.entries.get(self.cursor).map(|entry| &entry.cmd)
    }

    /// Apply a command and record it.
    ///
    /// On success any redo tail is discarded; on failure the history and the
    /// diagram are left untouched. The command may coalesce into the
    /// previous entry instead of adding a new one.
    pub fn push(
        &mut self,
        mut cmd: Command,
        g: &mut Diagram,
        vars: &mut VarRegistry,
    ) -> GraphResult<()>
    {
        cmd.apply(g, vars)?;
        self.entries.truncate(self.cursor);
        let now = Instant::now();
        let coalesce =
            self.entries.last()
            .is_some_and(|last| {
                !last.sealed
                    && now.duration_since(last.stamp) <= COALESCE_WINDOW
                    && last.cmd.can_merge(&cmd)
            });
        if coalesce {
            let last = self.entries.last_mut().unwrap();
            last.cmd.merge(cmd);
            last.stamp = now;
        } else {
            self.entries.push(Entry { cmd, stamp: now, sealed: false });
        }
        self.cursor = self.entries.len();
        Ok(())
    }

    /// Undo one step, returning `false` if there was nothing to undo.
    pub fn undo(&mut self, g: &mut Diagram, vars: &mut VarRegistry)
        -> GraphResult<bool>
    {
        let Some(k) = self.cursor.checked_sub(1) else {
            return Ok(false);
        };
        let entry = &mut self.entries[k];
        entry.cmd.invert(g, vars)?;
        entry.sealed = true;
        self.cursor = k;
        Ok(true)
    }

    /// Redo one step, returning `false` if there was nothing to redo.
    pub fn redo(&mut self, g: &mut Diagram, vars: &mut VarRegistry)
        -> GraphResult<bool>
    {
        if self.cursor == self.entries.len() { return Ok(false); }
        self.entries[self.cursor].cmd.apply(g, vars)?;
        self.cursor += 1;
        Ok(true)
    }

    /// Mark the end of an interaction: the most recent entry stops accepting
    /// coalesced moves.
    pub fn seal(&mut self) {
        if let Some(last) = self.entries.last_mut() {
            last.sealed = true;
        }
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{ EdgeKind, NodeKind };

    fn add_node_cmd(x: f64) -> Command {
        Command::AddNode { kind: NodeKind::Z, x, y: 0.0, id: None, undone: None }
    }

    fn move_cmd(id: usize, from: (f64, f64), to: (f64, f64)) -> Command {
        Command::MoveNodes { moves: vec![(id, from, to)] }
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();
        let empty = g.clone();

        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();
        let one = g.clone();
        hist.push(add_node_cmd(1.0), &mut g, &mut vars).unwrap();
        hist.push(
            Command::AddEdge {
                u: 0, v: 1, kind: EdgeKind::Plain,
                created: None, undone: None,
            },
            &mut g, &mut vars,
        ).unwrap();
        let three = g.clone();

        assert_eq!(hist.undo_depth(), 3);
        assert!(hist.undo(&mut g, &mut vars).unwrap());
        assert!(hist.undo(&mut g, &mut vars).unwrap());
        assert_eq!(g, one);
        assert!(hist.undo(&mut g, &mut vars).unwrap());
        assert_eq!(g, empty);
        assert!(!hist.undo(&mut g, &mut vars).unwrap());

        assert!(hist.redo(&mut g, &mut vars).unwrap());
        assert!(hist.redo(&mut g, &mut vars).unwrap());
        assert!(hist.redo(&mut g, &mut vars).unwrap());
        assert_eq!(g, three);
        assert!(!hist.redo(&mut g, &mut vars).unwrap());
    }

    #[test]
    fn push_discards_redo_tail() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();

        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();
        hist.push(add_node_cmd(1.0), &mut g, &mut vars).unwrap();
        hist.undo(&mut g, &mut vars).unwrap();
        assert!(hist.can_redo());
        hist.push(add_node_cmd(2.0), &mut g, &mut vars).unwrap();
        assert!(!hist.can_redo());
        assert_eq!(hist.undo_depth(), 2);
        assert!(!hist.redo(&mut g, &mut vars).unwrap());

        // the result is exactly "first then third" applied from scratch
        let mut expected = Diagram::new();
        let mut fresh = History::new();
        fresh.push(add_node_cmd(0.0), &mut expected, &mut vars).unwrap();
        fresh.push(add_node_cmd(2.0), &mut expected, &mut vars).unwrap();
        assert_eq!(g, expected);
    }

    #[test]
    fn failed_push_changes_nothing() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();
        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();
        let orig = g.clone();
        // self-loop is invalid
        let res =
            hist.push(
                Command::AddEdge {
                    u: 0, v: 0, kind: EdgeKind::Plain,
                    created: None, undone: None,
                },
                &mut g, &mut vars,
            );
        assert!(res.is_err());
        assert_eq!(g, orig);
        assert_eq!(hist.undo_depth(), 1);
    }

    #[test]
    fn drag_coalesces_to_one_step() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();
        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();

        hist.push(
            move_cmd(0, (0.0, 0.0), (1.0, 0.0)), &mut g, &mut vars,
        ).unwrap();
        hist.push(
            move_cmd(0, (1.0, 0.0), (2.0, 0.0)), &mut g, &mut vars,
        ).unwrap();
        hist.push(
            move_cmd(0, (2.0, 0.0), (3.0, 0.0)), &mut g, &mut vars,
        ).unwrap();
        // whole drag is one entry
        assert_eq!(hist.undo_depth(), 2);
        assert_eq!(g.get_node(0).unwrap().pos(), (3.0, 0.0));
        hist.undo(&mut g, &mut vars).unwrap();
        assert_eq!(g.get_node(0).unwrap().pos(), (0.0, 0.0));
        hist.redo(&mut g, &mut vars).unwrap();
        assert_eq!(g.get_node(0).unwrap().pos(), (3.0, 0.0));
    }

    #[test]
    fn seal_stops_coalescing() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();
        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();

        hist.push(
            move_cmd(0, (0.0, 0.0), (1.0, 0.0)), &mut g, &mut vars,
        ).unwrap();
        hist.seal();
        hist.push(
            move_cmd(0, (1.0, 0.0), (2.0, 0.0)), &mut g, &mut vars,
        ).unwrap();
        // two distinct drags, two distinct steps
        assert_eq!(hist.undo_depth(), 3);
        hist.undo(&mut g, &mut vars).unwrap();
        assert_eq!(g.get_node(0).unwrap().pos(), (1.0, 0.0));
    }

    #[test]
    fn distinct_node_sets_never_coalesce() {
        let mut g = Diagram::new();
        let mut vars = VarRegistry::new();
        let mut hist = History::new();
        hist.push(add_node_cmd(0.0), &mut g, &mut vars).unwrap();
        hist.push(add_node_cmd(1.0), &mut g, &mut vars).unwrap();
        hist.seal();

        hist.push(
            move_cmd(0, (0.0, 0.0), (0.0, 1.0)), &mut g, &mut vars,
        ).unwrap();
        hist.push(
            move_cmd(1, (1.0, 0.0), (1.0, 1.0)), &mut g, &mut vars,
        ).unwrap();
        assert_eq!(hist.undo_depth(), 4);
    }
}
