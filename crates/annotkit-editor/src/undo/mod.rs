//! Undo/redo
//!
//! - `chain`: ordered snapshots with a cursor and a depth limit
//! - `coordinator`: captures and restores document state around actions
//! - `facade`: optional bridge to a platform undo manager

mod chain;
mod coordinator;
mod facade;

pub use chain::{UndoChain, UndoEntry};
pub use coordinator::{UndoRedoCoordinator, DEFAULT_MAX_DEPTH};
pub use facade::{NoopFacade, PlatformRequest, PlatformUndoFacade};
