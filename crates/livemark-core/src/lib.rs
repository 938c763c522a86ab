#![warn(missing_docs)]
//! Livemark Core - Headless Live Markup Rendering Engine
//!
//! # Overview
//!
//! `livemark-core` turns a plain-text buffer written in a lightweight markup into a tree of
//! renderable nodes, and re-renders it on every edit. Markup syntax is hidden on lines the cursor
//! is not on and revealed verbatim on the lines it touches ("active lines"), which gives a
//! WYSIWYG-like editing experience over a raw text buffer.
//!
//! The engine is host-agnostic: it reads and writes a [`TextInputSurface`] and replaces the
//! children of a [`DisplaySurface`]. Selection and pointer events are fed in by the host.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  LiveEditor (mutations, hooks, selection)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Block Transform Engine                     │  ← ul / ol / p / pre wrappers
//! ├─────────────────────────────────────────────┤
//! │  Line Transform Engine + Range Assembly     │  ← headings, inline markup, displays
//! ├─────────────────────────────────────────────┤
//! │  Block Segmenter (ordered providers)        │  ← fences, blank-line blocks
//! ├─────────────────────────────────────────────┤
//! │  Content Store (rope, char offsets)         │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use livemark_core::{EditorOptions, LiveEditor, MemoryDisplay, MemoryInput, TextRange};
//!
//! let mut editor = LiveEditor::new(
//!     MemoryInput::default(),
//!     MemoryDisplay::new(),
//!     EditorOptions::new().with_initial_content("# Notes\n\n**bold** and _italic_"),
//! );
//!
//! let output = editor.output();
//! assert_eq!(output[0].tag(), Some("h1"));
//! assert_eq!(output[1].tag(), Some("p"));
//!
//! editor.set_content_at_range(TextRange::new(2, 7), "Todo");
//! assert_eq!(editor.get_content(), "# Todo\n\n**bold** and _italic_");
//! ```
//!
//! ## Hooks and deferred edits
//!
//! Callbacks receive an [`EditQueue`] instead of the editor. Queued edits run once the current
//! operation has completed.
//!
//! ```rust
//! use livemark_core::{EditorOptions, LifecycleEvent, LiveEditor, MemoryDisplay, MemoryInput};
//!
//! let mut editor = LiveEditor::new(MemoryInput::default(), MemoryDisplay::new(), EditorOptions::new());
//! editor.once(LifecycleEvent::Change, |event, edits| {
//!     if !event.content.ends_with('!') {
//!         edits.set_content(format!("{}!", event.content));
//!     }
//! });
//!
//! editor.set_content("hello");
//! assert_eq!(editor.get_content(), "hello!");
//! ```
//!
//! # Module Description
//!
//! - [`content`] - rope-backed buffer with char-offset ranges
//! - [`line`] - line splitting with absolute offsets
//! - [`provider`] - transformers and block providers
//! - [`segment`] - block segmentation state machine
//! - [`assembly`] - line transformers and nested range assembly
//! - [`block`] - block transformers
//! - [`markdown`] - the default dialect
//! - [`selection`] - active-line tracking
//! - [`lifecycle`] - `BeforeRender` / `Render` / `Change` hooks
//! - [`edits`] - deferred edits and interactive actions
//! - [`editor`] - the [`LiveEditor`] tying everything together

pub mod assembly;
pub mod block;
pub mod content;
pub mod editor;
pub mod edits;
mod error;
pub mod lifecycle;
pub mod line;
pub mod markdown;
pub mod node;
pub mod provider;
pub mod segment;
pub mod selection;
pub mod surface;

pub use assembly::{
    DisplayFn, LineContext, Padding, RangeDisplay, TextTransformResult, TransformOutput,
};
pub use block::BlockContext;
pub use content::{ContentStore, TextRange};
pub use editor::{EditorOptions, LiveEditor};
pub use edits::{ActionCallback, ActionId, DisplayContext, EditQueue, PendingEdit};
pub use error::{EditorError, Result};
pub use lifecycle::{HookCallback, HookEvent, LifecycleEvent, LifecycleHub, SubscriptionId};
pub use line::{Line, split_lines};
pub use markdown::default_block_providers;
pub use node::{LineMap, Node, NodeId, NodeKind, ParentNode};
pub use provider::{BlockProvider, BlockTransformFn, LineTransformFn, Transformer, TransformerKind};
pub use segment::{Block, segment};
pub use selection::{
    HostSelection, PointerButton, PointerEvent, PointerEventKind, SelectionPoint,
    SelectionTracker, affected_lines,
};
pub use surface::{DisplaySurface, MemoryDisplay, MemoryInput, TextInputSurface};
