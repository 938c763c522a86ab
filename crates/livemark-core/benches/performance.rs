use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use livemark_core::{
    EditorOptions, HostSelection, LiveEditor, MemoryDisplay, MemoryInput, SelectionPoint,
};

fn large_document(section_count: usize) -> String {
    let mut out = String::with_capacity(section_count * 160);
    for i in 0..section_count {
        out.push_str(&format!(
            "## Section {i}\n\nSome **bold** text, _italic_ text and a [link](https://example.com/{i}).\n\n- [ ] task {i}\n- item with `code`\n\n"
        ));
    }
    out.push_str("```\nfn main() {}\n```");
    out
}

fn editor(text: &str) -> LiveEditor<MemoryInput, MemoryDisplay> {
    LiveEditor::new(
        MemoryInput::default(),
        MemoryDisplay::new(),
        EditorOptions::new().with_initial_content(text),
    )
}

fn bench_initial_render(c: &mut Criterion) {
    let text = large_document(1_000);
    c.bench_function("initial_render/1k_sections", |b| {
        b.iter(|| {
            let editor = editor(black_box(&text));
            black_box(editor.output().len());
        })
    });
}

fn bench_typing_at_end(c: &mut Criterion) {
    let text = large_document(200);
    c.bench_function("typing_end/20_inserts", |b| {
        b.iter_batched(
            || editor(&text),
            |mut editor| {
                for _ in 0..20 {
                    let end = editor.get_content().chars().count();
                    editor.insert_content(end, "x");
                }
                black_box(editor.render_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_selection_rerender(c: &mut Criterion) {
    let text = large_document(200);
    let mut editor = editor(&text);
    // Top-level headings are the first line-mapped nodes.
    let ids: Vec<_> = editor
        .output()
        .iter()
        .filter_map(|n| n.id())
        .filter(|&id| editor.line_for_node(id).is_some())
        .take(2)
        .collect();

    c.bench_function("selection_rerender/200_sections", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let id = if flip { ids[0] } else { ids[1] };
            editor.update_selection(&HostSelection::caret(SelectionPoint::new(id, 0)));
            black_box(editor.get_active_lines().len());
        })
    });
}

criterion_group!(
    benches,
    bench_initial_render,
    bench_typing_at_end,
    bench_selection_rerender
);
criterion_main!(benches);
