//! # annotkit Editor
//!
//! Annotation editing for PDF viewers, independent of any UI toolkit or
//! rendering engine:
//! - Annotation model and per-type capabilities
//! - `DocumentModel` trait with an in-memory implementation
//! - Selection, handle layout and transform sessions (resize, move, rotate)
//! - The edit controller state machine
//! - Snapshot based undo/redo with a platform facade
//! - `ToolManager`, which wires all of the above to gesture input
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annotkit_editor::{Annotation, AnnotationType, EditorOptions, GestureEvent, MemoryDocument, ToolManager};
//! use annotkit_core::{Point, Rect};
//!
//! let mut doc = MemoryDocument::with_pages(1, Rect::new(0.0, 0.0, 612.0, 792.0));
//! let square = Annotation::new(AnnotationType::Square, 1, Rect::new(10.0, 10.0, 100.0, 50.0));
//! let id = square.id;
//! doc.add_annotation(square)?;
//!
//! let mut tools = ToolManager::new(doc, EditorOptions::default(), 100);
//! tools.select_annotation(id, 1);
//! tools.handle_gesture(GestureEvent::Began(Point::new(110.0, 60.0)));
//! tools.handle_gesture(GestureEvent::Ended(Point::new(150.0, 90.0)));
//! tools.undo();
//! ```

pub mod annotation;
pub mod document;
pub mod edit_controller;
pub mod memory_document;
pub mod selection;
pub mod tool_manager;
pub mod transform;
pub mod undo;

pub use annotation::{Annotation, AnnotationStyle, AnnotationType, Color};
pub use document::DocumentModel;
pub use edit_controller::{
    AnnotationEditController, DefaultDelegate, EditDelegate, EditState, EditorOptions,
};
pub use memory_document::{MemoryDocument, MemorySnapshot, Page};
pub use selection::{Handle, HandleLayout, SelectionSet};
pub use tool_manager::{GestureEvent, ToolManager};
pub use transform::{AspectGuide, TransformConstraints, TransformMode, TransformSession};
pub use undo::{
    NoopFacade, PlatformRequest, PlatformUndoFacade, UndoChain, UndoEntry, UndoRedoCoordinator,
    DEFAULT_MAX_DEPTH,
};
