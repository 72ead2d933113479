use zx_edit::{
    edit::{ Editor, Gesture },
    graph::{ EdgeKind, NodeKind },
};

// Drive the editor through a small session: two boundaries bracketing a
// Z-spider with a W branch hanging off it, then a symbolic phase label and a
// walk along the undo/redo history.
fn main() -> anyhow::Result<()> {
    let mut ed = Editor::new();

    ed.apply_gesture(Gesture::SelectNodeKind { kind: NodeKind::Boundary })?;
    ed.apply_gesture(Gesture::AddNodeAt { x: 0.0, y: 0.0 })?;
    ed.apply_gesture(Gesture::AddNodeAt { x: 4.0, y: 0.0 })?;
    ed.apply_gesture(Gesture::EditNodeText { id: 0, text: "0".to_string() })?;
    ed.apply_gesture(Gesture::EditNodeText { id: 1, text: "1".to_string() })?;

    ed.apply_gesture(Gesture::SelectNodeKind { kind: NodeKind::Z })?;
    ed.apply_gesture(Gesture::AddNodeAt { x: 2.0, y: 0.0 })?;
    ed.apply_gesture(Gesture::Connect { u: 0, v: 2 })?;
    ed.apply_gesture(Gesture::SelectEdgeKind { kind: EdgeKind::Hadamard })?;
    ed.apply_gesture(Gesture::Connect { u: 2, v: 1 })?;

    // W nodes come in pairs; connecting to the spider uses an ordinary wire
    ed.apply_gesture(Gesture::SelectNodeKind { kind: NodeKind::WInput })?;
    ed.apply_gesture(Gesture::AddNodeAt { x: 2.0, y: 2.0 })?;
    ed.apply_gesture(Gesture::SelectEdgeKind { kind: EdgeKind::Plain })?;
    ed.apply_gesture(Gesture::Connect { u: 3, v: 2 })?;

    ed.apply_gesture(
        Gesture::EditNodeText { id: 2, text: "a + 1/4".to_string() })?;
    println!("vars: {:?}", ed.vars().iter().collect::<Vec<_>>());

    ed.undo()?;
    println!(
        "after undo: [{}]", ed.graph().get_node(2).unwrap().phase.label());
    ed.redo()?;
    println!(
        "after redo: [{}]", ed.graph().get_node(2).unwrap().phase.label());

    ed.graph().save_graphviz("editor_session.gv")?;
    Ok(())
}
