use livemark_core::markdown::{code_block_provider, generic_block_provider};
use livemark_core::{
    BlockProvider, EditorOptions, HostSelection, LiveEditor, MemoryDisplay, MemoryInput, Node,
    ParentNode, RangeDisplay, SelectionPoint, Transformer,
};
use pretty_assertions::assert_eq;

fn editor_with(
    content: &str,
    providers: Option<Vec<BlockProvider>>,
) -> LiveEditor<MemoryInput, MemoryDisplay> {
    let mut options = EditorOptions::new().with_initial_content(content);
    if let Some(providers) = providers {
        options = options.with_block_providers(providers);
    }
    LiveEditor::new(MemoryInput::default(), MemoryDisplay::new(), options)
}

fn render(content: &str) -> Vec<String> {
    editor_with(content, None).output().iter().map(sketch).collect()
}

/// Compact tree notation: `tag(child child)` for elements, quoted text for text nodes.
fn sketch(node: &Node) -> String {
    match node.as_text() {
        Some(text) => format!("{text:?}"),
        None => {
            let children: Vec<_> = node.children().iter().map(sketch).collect();
            format!("{}({})", node.tag().unwrap_or("?"), children.join(" "))
        }
    }
}

#[test]
fn test_sibling_inline_markup() {
    assert_eq!(
        render("**bold** and _ital_"),
        vec![r#"p(b("bold") " and " i("ital"))"#]
    );
}

#[test]
fn test_nested_inline_markup() {
    assert_eq!(render("_**x**_"), vec![r#"p(i(b("x")))"#]);
}

#[test]
fn test_overlapping_inline_markup_keeps_higher_priority_match() {
    assert_eq!(
        render("`a**b` and **c**"),
        vec![r#"p(code("a**b") " and **c**")"#]
    );
}

#[test]
fn test_links_strike_and_code() {
    assert_eq!(
        render("see [docs](https://x.dev) ~~old~~ `new`"),
        vec![r#"p("see " a("docs") " " del("old") " " code("new"))"#]
    );
    let editor = editor_with("[docs](https://x.dev)", None);
    assert_eq!(editor.output()[0].children()[0].attr("href"), Some("https://x.dev"));
}

#[test]
fn test_empty_captures_are_left_as_text() {
    assert_eq!(render("**** and __"), vec![r#"p("**** and __")"#]);
}

#[test]
fn test_headings_and_levels() {
    assert_eq!(
        render("# a\n\n### c\n\n####### seven"),
        vec![
            r#"h1(" a")"#.to_string(),
            r#"h3(" c")"#.to_string(),
            r##"h6("# seven")"##.to_string(),
        ]
    );
}

#[test]
fn test_lists() {
    assert_eq!(
        render("- a\n- b\n\n1. one\n2. two"),
        vec![
            r#"ul(li("a") li("b"))"#.to_string(),
            r#"ol(li("one") li("two"))"#.to_string(),
        ]
    );
}

#[test]
fn test_mixed_block_is_not_wrapped_in_a_paragraph() {
    assert_eq!(
        render("# t\ntext"),
        vec![r#"h1(" t")"#.to_string(), r#""text""#.to_string()]
    );
}

#[test]
fn test_quote_rule_and_image() {
    let editor = editor_with("> q\n\n---\n\n![image](cat.png) A cat", None);
    let sketches: Vec<_> = editor.output().iter().map(sketch).collect();
    assert_eq!(sketches, vec![r#"blockquote("q")"#, "hr()", "p(img())"]);

    let img = &editor.output()[2].children()[0];
    assert_eq!(img.attr("src"), Some("cat.png"));
    assert_eq!(img.attr("title"), Some("A cat"));
}

#[test]
fn test_consecutive_fences_are_two_blocks() {
    let editor = editor_with("```\na\n```\n```\nb\n```", None);
    let blocks: Vec<_> = editor
        .blocks()
        .iter()
        .map(|b| (b.provider, b.lines.len(), b.is_terminated()))
        .collect();
    assert_eq!(blocks, vec![(0, 1, true), (0, 1, true)]);

    let sketches: Vec<_> = editor.output().iter().map(sketch).collect();
    assert_eq!(sketches, vec![r#"pre(code("a"))"#, r#"pre(code("b"))"#]);
}

#[test]
fn test_code_is_not_transformed_and_unterminated_fence_is_flushed() {
    assert_eq!(
        render("```\n# not a heading\n**x**"),
        vec![r##"pre(code("# not a heading" "**x**"))"##]
    );
}

#[test]
fn test_range_display_follows_active_lines() {
    let marker = Transformer::line(|ctx| {
        ctx.define_range_display(RangeDisplay::new(
            0,
            2,
            |_| None,
            |display| Some(Node::text(format!("[{}]", display.line().idx))),
        ));
    });
    let providers = vec![
        BlockProvider::new("", "")
            .with_end_of_prev_as_start_of_next(true)
            .with_transformer(marker),
    ];
    let mut editor = editor_with("ab cd\nef gh", Some(providers));

    let texts = |editor: &LiveEditor<MemoryInput, MemoryDisplay>| -> Vec<String> {
        editor.output().iter().map(Node::text_content).collect()
    };
    assert!(editor.get_active_lines().is_empty());
    assert_eq!(texts(&editor), vec![" cd", " gh"]);

    let second = editor.output()[1].id().expect("id");
    editor.update_selection(&HostSelection::caret(SelectionPoint::new(second, 0)));

    assert_eq!(editor.get_active_lines(), &[2]);
    assert_eq!(texts(&editor), vec![" cd", "[2]", " gh"]);
}

#[test]
fn test_custom_text_transformer_and_provider_order() {
    let mark = Transformer::text_pattern(r"==(.*?)==", |_| ParentNode::new(Node::element("mark")))
        .expect("valid pattern");
    let providers = vec![
        code_block_provider(),
        generic_block_provider().with_transformer(mark),
    ];
    let editor = editor_with("a ==b== c", Some(providers));
    assert_eq!(
        editor.output().iter().map(sketch).collect::<Vec<_>>(),
        vec![r#"p("a " mark("b") " c")"#]
    );
}
