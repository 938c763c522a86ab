//! Live preview example
//!
//! Renders a small document, moves the caret onto the task list and toggles a checkbox.

use livemark_core::{
    EditorOptions, HostSelection, LifecycleEvent, LiveEditor, MemoryDisplay, MemoryInput, Node,
    SelectionPoint,
};

fn outline(nodes: &[Node], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node.as_text() {
            Some(text) => println!("{indent}{text:?}"),
            None => {
                let action = node
                    .action()
                    .map(|a| format!(" action={a}"))
                    .unwrap_or_default();
                println!("{indent}<{}>{action}", node.tag().unwrap_or("?"));
                outline(node.children(), depth + 1);
            }
        }
    }
}

fn main() {
    let mut editor = LiveEditor::new(
        MemoryInput::default(),
        MemoryDisplay::new(),
        EditorOptions::new()
            .with_initial_content("# Groceries\n\n- [ ] milk\n- [x] bread\n\nSee **notes**."),
    );
    editor.on(LifecycleEvent::Change, |event, _| {
        println!("-- change ({} chars)", event.content.chars().count());
    });

    println!("1. Initial render:");
    outline(editor.output(), 1);

    println!("\n2. Caret on the first task:");
    let list = &editor.output()[1];
    if let Some(id) = list.children()[0].id() {
        editor.update_selection(&HostSelection::caret(SelectionPoint::new(id, 0)));
    }
    println!("   active lines: {:?}", editor.get_active_lines());
    outline(editor.output(), 1);

    println!("\n3. Caret on the heading, then toggle the second task:");
    if let Some(id) = editor.output()[0].id() {
        editor.update_selection(&HostSelection::caret(SelectionPoint::new(id, 0)));
    }
    let action = editor.output()[1].children()[1].children()[0].action();
    if let Some(action) = action {
        editor
            .dispatch(action)
            .expect("action bound by the current render");
    }
    println!("{}", editor.get_content());

    println!("\n4. JSON snapshot of the heading:");
    let json = serde_json::to_string_pretty(&editor.output()[0]).expect("serializable node");
    println!("{json}");
}
