//! Deferred edits and interactive action bindings.
//!
//! Callbacks never receive the editor itself. Lifecycle hooks and bound actions get an
//! [`EditQueue`]; the editor applies the queued edits in FIFO order once the operation that ran the
//! callback (a render, a hook dispatch, an action dispatch) has fully completed. A mutation issued
//! while a render is in progress is therefore never applied re-entrantly.
//!
//! Display callbacks get a [`DisplayContext`], through which they can [`bind`](DisplayContext::bind)
//! an action to the element they return. Bindings live for exactly one render.

use crate::content::TextRange;
use crate::line::Line;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Identifier of an interactive binding attached to a rendered element.
///
/// Ids are never reused within one editor, so an id from an earlier render cannot reach a binding
/// created by a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A content mutation waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEdit {
    /// Replace the whole buffer.
    SetContent(String),
    /// Insert text at a char offset.
    Insert {
        /// Char offset.
        offset: usize,
        /// Inserted text.
        text: String,
    },
    /// Replace a char range.
    SetRange {
        /// Replaced range.
        range: TextRange,
        /// Replacement text.
        text: String,
    },
}

/// The narrow mutation API handed to callbacks.
#[derive(Debug, Default)]
pub struct EditQueue {
    edits: VecDeque<PendingEdit>,
}

impl EditQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a whole-buffer replacement.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.edits.push_back(PendingEdit::SetContent(text.into()));
    }

    /// Queue an insertion.
    pub fn insert_content(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push_back(PendingEdit::Insert {
            offset,
            text: text.into(),
        });
    }

    /// Queue a range replacement.
    pub fn set_content_at_range(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.push_back(PendingEdit::SetRange {
            range,
            text: text.into(),
        });
    }

    /// Queued edits, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingEdit> {
        self.edits.iter()
    }

    /// Number of queued edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub(crate) fn pop_front(&mut self) -> Option<PendingEdit> {
        self.edits.pop_front()
    }
}

/// Callback run when the host dispatches an [`ActionId`].
pub type ActionCallback = Box<dyn FnMut(&mut EditQueue)>;

/// Per-render table of interactive bindings.
#[derive(Default)]
pub(crate) struct ActionRegistry {
    next_id: u64,
    actions: HashMap<ActionId, ActionCallback>,
}

impl ActionRegistry {
    pub(crate) fn bind(&mut self, callback: ActionCallback) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        self.actions.insert(id, callback);
        id
    }

    pub(crate) fn get_mut(&mut self, id: ActionId) -> Option<&mut ActionCallback> {
        self.actions.get_mut(&id)
    }

    /// Detach every binding created by the previous render.
    pub(crate) fn clear(&mut self) {
        self.actions.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.actions.len()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("next_id", &self.next_id)
            .field("bound", &self.actions.len())
            .finish()
    }
}

/// Context passed to [`RangeDisplay`](crate::RangeDisplay) callbacks.
pub struct DisplayContext<'a> {
    line: &'a Line,
    actions: &'a mut ActionRegistry,
}

impl<'a> DisplayContext<'a> {
    pub(crate) fn new(line: &'a Line, actions: &'a mut ActionRegistry) -> Self {
        Self { line, actions }
    }

    /// The line being rendered.
    pub fn line(&self) -> &'a Line {
        self.line
    }

    /// Bind an action for the lifetime of the current render.
    pub fn bind<F>(&mut self, callback: F) -> ActionId
    where
        F: FnMut(&mut EditQueue) + 'static,
    {
        self.actions.bind(Box::new(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = EditQueue::new();
        queue.insert_content(0, "a");
        queue.set_content_at_range(TextRange::new(1, 2), "b");
        queue.set_content("c");

        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.pop_front(),
            Some(PendingEdit::Insert {
                offset: 0,
                text: "a".to_string()
            })
        );
        assert!(matches!(queue.pop_front(), Some(PendingEdit::SetRange { .. })));
        assert_eq!(queue.pop_front(), Some(PendingEdit::SetContent("c".to_string())));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_action_ids_are_not_reused_after_clear() {
        let mut registry = ActionRegistry::default();
        let first = registry.bind(Box::new(|_| {}));
        registry.clear();
        let second = registry.bind(Box::new(|_| {}));

        assert_ne!(first, second);
        assert!(registry.get_mut(first).is_none());
        assert!(registry.get_mut(second).is_some());
        assert_eq!(registry.len(), 1);
    }
}
