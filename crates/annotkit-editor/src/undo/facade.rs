//! Platform undo facade
//!
//! Hosts with a system undo manager (menu items, shake-to-undo, keyboard
//! shortcuts) mirror the chain through these hooks. Requests coming from the
//! platform go back through `ToolManager::handle_platform_request`.

use serde::{Deserialize, Serialize};

/// Hooks called by the coordinator after the chain changes
pub trait PlatformUndoFacade {
    fn did_record(&mut self, _description: &str) {}

    fn did_undo(&mut self, _description: &str) {}

    fn did_redo(&mut self, _description: &str) {}

    fn did_clear(&mut self) {}

    /// Undo availability changed (host permission or a modal session).
    fn did_change_enabled(&mut self, _enabled: bool) {}
}

/// Facade for hosts without a platform undo manager
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFacade;

impl PlatformUndoFacade for NoopFacade {}

/// Undo or redo requested by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformRequest {
    Undo,
    Redo,
}
