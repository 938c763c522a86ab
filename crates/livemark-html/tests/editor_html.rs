use livemark_core::{
    EditorOptions, HostSelection, LiveEditor, MemoryInput, SelectionPoint, TextInputSurface,
};
use livemark_html::{HtmlRenderer, HtmlSurface};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "# Title\n\n- a\n- b\n\n1. one\n2. two\n\n- [ ] task\n\n```\nlet x = 1;\n```\n\n> quote\n\n---\n\nplain **b** [l](u)";

fn editor(content: &str) -> LiveEditor<MemoryInput, HtmlSurface> {
    LiveEditor::new(
        MemoryInput::default(),
        HtmlSurface::new(),
        EditorOptions::new().with_initial_content(content),
    )
}

#[test]
fn test_default_dialect_renders_to_html() {
    let editor = editor(DOCUMENT);
    assert_eq!(
        editor.display().html(),
        concat!(
            "<h1> Title</h1>",
            "<ul><li>a</li><li>b</li></ul>",
            "<ol><li>one</li><li>two</li></ol>",
            "<ul><li><input type=\"checkbox\"> task</li></ul>",
            "<pre><code>let x = 1;</code></pre>",
            "<blockquote>quote</blockquote>",
            "<hr>",
            "<p>plain <b>b</b> <a href=\"u\">l</a></p>",
        )
    );
}

#[test]
fn test_active_heading_reveals_syntax() {
    let mut editor = editor("# Title\n\nbody");
    let Some(heading) = editor.output()[0].id() else {
        panic!("committed nodes carry ids");
    };

    editor.update_selection(&HostSelection::caret(SelectionPoint::new(heading, 0)));

    assert_eq!(editor.get_active_lines(), &[1]);
    assert_eq!(editor.display().html(), "<h1># Title</h1><p>body</p>");
}

#[test]
fn test_typing_updates_html() {
    let mut editor = editor("");
    assert_eq!(editor.display().html(), "");

    editor.input_mut().type_text("~~gone~~ `code`");
    editor.handle_input();

    assert_eq!(editor.input().value(), "~~gone~~ `code`");
    assert_eq!(
        editor.display().html(),
        "<p><del>gone</del> <code>code</code></p>"
    );
}

#[test]
fn test_renderer_emits_node_ids() {
    let editor = editor("x");
    let html = HtmlRenderer::new().with_node_ids(true).render(editor.output());
    assert_eq!(html, "<p data-node=\"0\">x</p>");
}
