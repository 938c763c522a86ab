//! Selection tracking.
//!
//! The host reports its selection in terms of committed [`NodeId`]s (see [`crate::node`]). The
//! tracker maps anchor and extent back to line indices through the [`LineMap`] of the previous
//! render and keeps the inclusive set of active lines. The editor re-renders only when that set
//! changes.

use crate::node::{LineMap, NodeId};

/// A position inside the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    /// The node holding the position (usually a text node).
    pub node: NodeId,
    /// Offset inside that node.
    pub offset: usize,
}

impl SelectionPoint {
    /// Create a new selection point.
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The host's selection: an anchor plus an optional extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSelection {
    /// Where the selection started.
    pub anchor: SelectionPoint,
    /// Where it ends, if it is not collapsed.
    pub extent: Option<SelectionPoint>,
}

impl HostSelection {
    /// A collapsed selection (caret).
    pub fn caret(anchor: SelectionPoint) -> Self {
        Self {
            anchor,
            extent: None,
        }
    }

    /// A ranged selection.
    pub fn range(anchor: SelectionPoint, extent: SelectionPoint) -> Self {
        Self {
            anchor,
            extent: Some(extent),
        }
    }
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Auxiliary,
}

/// A pointer event over the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerEventKind,
    /// Button involved.
    pub button: PointerButton,
}

impl PointerEvent {
    /// Create a pointer event.
    pub fn new(kind: PointerEventKind, button: PointerButton) -> Self {
        Self { kind, button }
    }
}

/// Active-line state derived from the host selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    active: Vec<usize>,
    tracking_moves: bool,
}

impl SelectionTracker {
    /// Create a tracker with no active lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active line indices, ascending.
    pub fn active_lines(&self) -> &[usize] {
        &self.active
    }

    /// Returns `true` if `line` is active.
    pub fn is_active(&self, line: usize) -> bool {
        self.active.contains(&line)
    }

    /// Returns `true` between a primary-button press and its release.
    pub fn is_tracking_moves(&self) -> bool {
        self.tracking_moves
    }

    /// Handle a pointer event. Returns `true` if the active-line set changed.
    ///
    /// Moves are only followed while the primary button is held.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        selection: Option<&HostSelection>,
        map: &LineMap,
    ) -> bool {
        let primary = event.button == PointerButton::Primary;
        match event.kind {
            PointerEventKind::Down => {
                let changed = selection.is_some_and(|sel| self.update(sel, map));
                if primary {
                    self.tracking_moves = true;
                }
                changed
            }
            PointerEventKind::Move => {
                self.tracking_moves && selection.is_some_and(|sel| self.update(sel, map))
            }
            PointerEventKind::Up => {
                if !primary {
                    return false;
                }
                self.tracking_moves = false;
                selection.is_some_and(|sel| self.update(sel, map))
            }
        }
    }

    /// Recompute the active lines from `selection`. Returns `true` if they changed.
    ///
    /// A selection whose anchor is not part of the rendered output is ignored.
    pub fn update(&mut self, selection: &HostSelection, map: &LineMap) -> bool {
        let Some(lines) = affected_lines(selection, map) else {
            return false;
        };
        if lines == self.active {
            return false;
        }
        self.active = lines;
        true
    }

    /// Forget the active lines. Returns `true` if any were active.
    pub fn clear(&mut self) -> bool {
        let changed = !self.active.is_empty();
        self.active.clear();
        changed
    }
}

/// Inclusive line range touched by `selection`, or `None` if the anchor is not mapped.
pub fn affected_lines(selection: &HostSelection, map: &LineMap) -> Option<Vec<usize>> {
    let anchor = map.line_of(selection.anchor.node)?;
    let extent = selection
        .extent
        .filter(|extent| extent.node != selection.anchor.node)
        .and_then(|extent| map.line_of(extent.node));

    Some(match extent {
        Some(extent) => (anchor.min(extent)..=anchor.max(extent)).collect(),
        None => vec![anchor],
    })
}
