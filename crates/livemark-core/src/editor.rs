//! The live editor.
//!
//! [`LiveEditor`] owns the buffer, the provider configuration, the two host surfaces and all
//! per-render state. Every public mutation runs to completion (buffer update, input write,
//! `Change` hooks, render) before any edit queued by a callback is applied.

use crate::assembly::{TransformOutput, transform_line};
use crate::block::transform_block;
use crate::content::{ContentStore, TextRange};
use crate::edits::{ActionId, ActionRegistry, EditQueue, PendingEdit};
use crate::error::{EditorError, Result};
use crate::lifecycle::{HookEvent, LifecycleEvent, LifecycleHub, SubscriptionId};
use crate::line::split_lines;
use crate::markdown::default_block_providers;
use crate::node::{LineMap, Node, NodeId, commit};
use crate::provider::BlockProvider;
use crate::segment::{Block, segment};
use crate::selection::{HostSelection, PointerEvent, SelectionTracker};
use crate::surface::{DisplaySurface, TextInputSurface};
use tracing::{debug, trace};

/// Construction options for [`LiveEditor`].
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    /// Initial buffer content (empty when `None`).
    pub initial_content: Option<String>,
    /// Ordered provider list ([`default_block_providers`] when `None`).
    pub block_providers: Option<Vec<BlockProvider>>,
}

impl EditorOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial buffer content.
    pub fn with_initial_content(mut self, content: impl Into<String>) -> Self {
        self.initial_content = Some(content.into());
        self
    }

    /// Replace the default providers.
    pub fn with_block_providers(mut self, providers: Vec<BlockProvider>) -> Self {
        self.block_providers = Some(providers);
        self
    }
}

/// A live markup editor bound to a text input surface and a display surface.
#[derive(Debug)]
pub struct LiveEditor<I, D> {
    store: ContentStore,
    providers: Vec<BlockProvider>,
    input: I,
    display: D,
    hub: LifecycleHub,
    tracker: SelectionTracker,
    actions: ActionRegistry,
    queue: EditQueue,
    output: Vec<Node>,
    blocks: Vec<Block>,
    line_map: LineMap,
    input_attached: bool,
    render_count: u64,
}

impl<I, D> LiveEditor<I, D>
where
    I: TextInputSurface,
    D: DisplaySurface,
{
    /// Create an editor and perform the initial render.
    pub fn new(input: I, display: D, options: EditorOptions) -> Self {
        let EditorOptions {
            initial_content,
            block_providers,
        } = options;
        let mut editor = Self {
            store: ContentStore::new(initial_content.as_deref().unwrap_or_default()),
            providers: block_providers.unwrap_or_else(default_block_providers),
            input,
            display,
            hub: LifecycleHub::new(),
            tracker: SelectionTracker::new(),
            actions: ActionRegistry::default(),
            queue: EditQueue::new(),
            output: Vec::new(),
            blocks: Vec::new(),
            line_map: LineMap::default(),
            input_attached: true,
            render_count: 0,
        };
        editor.render();
        editor.flush_pending();
        editor
    }

    /// The whole buffer.
    pub fn get_content(&self) -> String {
        self.store.get_content()
    }

    /// Text inside `range` (char offsets, clamped); empty when `start == end`.
    pub fn get_content_at_range(&self, range: TextRange) -> String {
        self.store.get_content_at_range(range)
    }

    /// Replace the whole buffer. Does nothing (no `Change`, no render) if `text` equals the
    /// current content.
    pub fn set_content(&mut self, text: &str) {
        self.apply_content(text);
        self.flush_pending();
    }

    /// Insert `text` at char offset `offset` (clamped to the buffer length).
    pub fn insert_content(&mut self, offset: usize, text: &str) {
        self.apply(PendingEdit::Insert {
            offset,
            text: text.to_string(),
        });
        self.flush_pending();
    }

    /// Replace `range` with `text`. Does nothing when `range.start == range.end`.
    pub fn set_content_at_range(&mut self, range: TextRange, text: &str) {
        self.apply(PendingEdit::SetRange {
            range,
            text: text.to_string(),
        });
        self.flush_pending();
    }

    /// Active line indices, ascending.
    pub fn get_active_lines(&self) -> &[usize] {
        self.tracker.active_lines()
    }

    /// Subscribe to a lifecycle event until [`LiveEditor::off`].
    pub fn on<F>(&mut self, event: LifecycleEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&HookEvent<'_>, &mut EditQueue) + 'static,
    {
        self.hub.on(event, callback)
    }

    /// Subscribe to the next firing of a lifecycle event.
    pub fn once<F>(&mut self, event: LifecycleEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&HookEvent<'_>, &mut EditQueue) + 'static,
    {
        self.hub.once(event, callback)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.hub.off(id)
    }

    /// Detach from the input surface: later [`LiveEditor::handle_input`] calls are ignored.
    ///
    /// Subscriptions are kept; programmatic mutations still render.
    pub fn destroy(&mut self) {
        self.input_attached = false;
    }

    /// Returns `false` once [`LiveEditor::destroy`] was called.
    pub fn is_attached(&self) -> bool {
        self.input_attached
    }

    /// Pull the input surface's value into the buffer (the host's "input" notification).
    pub fn handle_input(&mut self) {
        if !self.input_attached {
            trace!("input ignored after destroy");
            return;
        }
        let value = self.input.value();
        self.set_content(&value);
    }

    /// Feed a pointer event with the host's current selection. Re-renders if the active lines
    /// changed.
    pub fn pointer_event(&mut self, event: PointerEvent, selection: Option<&HostSelection>) {
        if self
            .tracker
            .handle_pointer(event, selection, &self.line_map)
        {
            self.render();
        }
        self.flush_pending();
    }

    /// Recompute the active lines from a selection reported outside of pointer events.
    pub fn update_selection(&mut self, selection: &HostSelection) {
        if self.tracker.update(selection, &self.line_map) {
            self.render();
        }
        self.flush_pending();
    }

    /// Run the action bound to a rendered element, then apply the edits it queued.
    pub fn dispatch(&mut self, action: ActionId) -> Result<()> {
        let callback = self
            .actions
            .get_mut(action)
            .ok_or(EditorError::UnknownAction(action))?;
        callback(&mut self.queue);
        self.flush_pending();
        Ok(())
    }

    /// Output of the last render.
    pub fn output(&self) -> &[Node] {
        &self.output
    }

    /// Line index that produced a node of the last render.
    pub fn line_for_node(&self, id: NodeId) -> Option<usize> {
        self.line_map.line_of(id)
    }

    /// Blocks of the last render.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Configured providers, in order.
    pub fn providers(&self) -> &[BlockProvider] {
        &self.providers
    }

    /// The text input surface.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Mutable access to the text input surface (e.g. to simulate typing).
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// The display surface.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display surface.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Number of renders performed so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    fn apply(&mut self, edit: PendingEdit) {
        match edit {
            PendingEdit::SetContent(text) => self.apply_content(&text),
            PendingEdit::Insert { offset, text } => {
                let next = self.store.spliced(TextRange::new(offset, offset), &text);
                self.apply_content(&next);
            }
            PendingEdit::SetRange { range, text } => {
                if range.start == range.end {
                    return;
                }
                let next = self.store.spliced(range, &text);
                self.apply_content(&next);
            }
        }
    }

    fn apply_content(&mut self, text: &str) {
        if !self.store.replace(text) {
            return;
        }
        self.input.set_value(text);
        self.hub.emit(LifecycleEvent::Change, text, &mut self.queue);
        self.render();
    }

    fn flush_pending(&mut self) {
        while let Some(edit) = self.queue.pop_front() {
            trace!(?edit, "applying queued edit");
            self.apply(edit);
        }
    }

    fn render(&mut self) {
        let content = self.store.get_content();
        self.actions.clear();
        self.hub
            .emit(LifecycleEvent::BeforeRender, &content, &mut self.queue);
        self.render_impl(&content);
        self.hub.emit(LifecycleEvent::Render, &content, &mut self.queue);
        self.render_count += 1;
    }

    fn render_impl(&mut self, content: &str) {
        if content.is_empty() {
            self.output.clear();
            self.blocks.clear();
            self.line_map = LineMap::default();
            self.input.set_value("");
            self.display.replace_children(&[]);
            debug!("rendered empty buffer");
            return;
        }

        let lines = split_lines(content);
        let blocks = segment(&lines, &self.providers);

        let mut output = Vec::new();
        for block in &blocks {
            let provider = &self.providers[block.provider];
            let line_outputs: Vec<TransformOutput> = block
                .lines
                .iter()
                .map(|line| {
                    transform_line(
                        line,
                        provider.line_transformers(),
                        self.tracker.is_active(line.idx),
                        &mut self.actions,
                    )
                })
                .collect();
            let block_output =
                transform_block(&block.lines, provider.block_transformers(), line_outputs);
            output.extend(block_output.into_nodes());
        }

        self.line_map = commit(&mut output);
        self.input.set_value(content);
        self.display.replace_children(&output);
        debug!(
            lines = lines.len() - 1,
            blocks = blocks.len(),
            nodes = output.len(),
            actions = self.actions.len(),
            "rendered"
        );
        self.output = output;
        self.blocks = blocks;
    }
}
