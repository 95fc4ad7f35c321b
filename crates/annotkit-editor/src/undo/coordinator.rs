//! Undo/redo coordinator
//!
//! Every notification is sent *before* the action mutates the document and
//! captures the state the action will be reversed to. A failed capture never
//! blocks the action: the entry is dropped and the user is warned.

use annotkit_core::event_bus::{DocumentEvent, EditorEvent, EventBus, HistoryEvent, NoticeEvent};
use annotkit_core::{PageNumber, SnapshotError};
use std::sync::Arc;

use super::chain::UndoChain;
use super::facade::{NoopFacade, PlatformUndoFacade};
use crate::annotation::AnnotationType;
use crate::document::DocumentModel;

/// Default number of undoable actions kept.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Snapshot chain for one document
pub struct UndoRedoCoordinator<D: DocumentModel> {
    chain: UndoChain<D::Snapshot>,
    host_enabled: bool,
    session_active: bool,
    facade: Box<dyn PlatformUndoFacade>,
    bus: Arc<EventBus>,
}

impl<D: DocumentModel> UndoRedoCoordinator<D> {
    pub fn new(max_depth: usize, bus: Arc<EventBus>) -> Self {
        Self {
            chain: UndoChain::new(max_depth),
            host_enabled: true,
            session_active: false,
            facade: Box::new(NoopFacade),
            bus,
        }
    }

    pub fn set_facade(&mut self, facade: Box<dyn PlatformUndoFacade>) {
        self.facade = facade;
    }

    pub fn chain(&self) -> &UndoChain<D::Snapshot> {
        &self.chain
    }

    /// Undo is available: the host allows it and no modal edit is running.
    pub fn is_enabled(&self) -> bool {
        self.host_enabled && !self.session_active
    }

    /// Host permission. While disabled nothing is recorded.
    pub fn set_host_enabled(&mut self, enabled: bool) {
        let was = self.is_enabled();
        self.host_enabled = enabled;
        self.enabled_changed(was);
    }

    /// Mark a modal edit session (e.g. a drag) as running.
    pub fn set_session_active(&mut self, active: bool) {
        let was = self.is_enabled();
        self.session_active = active;
        self.enabled_changed(was);
    }

    fn enabled_changed(&mut self, was: bool) {
        let now = self.is_enabled();
        if was != now {
            tracing::debug!("Undo {}", if now { "enabled" } else { "disabled" });
            self.facade.did_change_enabled(now);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.is_enabled() && self.chain.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.is_enabled() && self.chain.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.chain.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.chain.redo_description()
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.chain.set_max_depth(max_depth);
    }

    /// Capture the current document state as the undo point for the action
    /// about to happen, truncating anything redoable.
    ///
    /// Returns `Ok(false)` when the host has disabled undo.
    pub fn take_snapshot(&mut self, doc: &D, description: &str) -> Result<bool, SnapshotError> {
        if !self.host_enabled {
            tracing::debug!("Undo disabled by host, not recording '{}'", description);
            return Ok(false);
        }
        let state = doc.capture_state()?;
        let entry = self.chain.record(description, state);
        tracing::debug!("Recorded undo entry #{}: {}", entry.index, description);
        self.facade.did_record(description);
        self.bus.emit(EditorEvent::History(HistoryEvent::Recorded {
            description: description.to_string(),
        }));
        Ok(true)
    }

    /// Record a snapshot, turning a capture failure into a warning.
    fn record(&mut self, doc: &D, description: &str) -> bool {
        match self.take_snapshot(doc, description) {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::warn!("'{}' will not be undoable: {}", description, e);
                self.bus.emit(EditorEvent::Notice(NoticeEvent::SnapshotUnavailable {
                    action: description.to_string(),
                    reason: e.to_string(),
                }));
                false
            }
        }
    }

    pub fn annotation_added(&mut self, doc: &D, kind: AnnotationType) -> bool {
        self.record(doc, &format!("Add {}", kind))
    }

    /// `action` describes the change, e.g. "Move annotation".
    pub fn annotation_modified(&mut self, doc: &D, action: &str) -> bool {
        self.record(doc, action)
    }

    pub fn annotation_removed(&mut self, doc: &D, kind: AnnotationType) -> bool {
        self.record(doc, &format!("Delete {}", kind))
    }

    pub fn form_field_data_modified(&mut self, doc: &D) -> bool {
        self.record(doc, "Fill form field")
    }

    pub fn page_added(&mut self, doc: &D, page: PageNumber) -> bool {
        self.record(doc, &format!("Add page {}", page))
    }

    pub fn page_moved(&mut self, doc: &D, from: PageNumber, to: PageNumber) -> bool {
        self.record(doc, &format!("Move page {} to {}", from, to))
    }

    pub fn page_removed(&mut self, doc: &D, page: PageNumber) -> bool {
        self.record(doc, &format!("Delete page {}", page))
    }

    pub fn page_content_modified(&mut self, doc: &D, page: PageNumber) -> bool {
        self.record(doc, &format!("Edit page {}", page))
    }

    /// Drop the latest entry after its action failed to apply.
    pub fn discard_last(&mut self) -> bool {
        self.chain.discard_last()
    }

    /// Restore the state before the last action. Returns its description,
    /// or `None` if there was nothing to undo or the restore failed.
    pub fn undo(&mut self, doc: &mut D) -> Option<String> {
        if !self.is_enabled() {
            tracing::debug!("Undo requested while disabled");
            return None;
        }
        let before = self.chain.peek_undo()?.before().clone();
        let description = self.chain.undo_description()?.to_string();

        let after = match doc.capture_state() {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("'{}' will not be redoable: {}", description, e);
                self.bus.emit(EditorEvent::Notice(NoticeEvent::SnapshotUnavailable {
                    action: description.clone(),
                    reason: e.to_string(),
                }));
                None
            }
        };

        if let Err(e) = doc.restore_state(&before) {
            self.restore_failed(&description, e);
            return None;
        }

        let description = self.chain.step_back(after)?;
        tracing::info!("Undo: {}", description);
        self.facade.did_undo(&description);
        self.bus.emit(EditorEvent::History(HistoryEvent::Undone {
            description: description.clone(),
        }));
        self.bus.emit(EditorEvent::Document(DocumentEvent::Reloaded));
        Some(description)
    }

    /// Reapply the last undone action.
    pub fn redo(&mut self, doc: &mut D) -> Option<String> {
        if !self.is_enabled() {
            tracing::debug!("Redo requested while disabled");
            return None;
        }
        let entry = self.chain.peek_redo()?;
        let after = entry.after()?.clone();
        let description = entry.description.clone();

        if let Err(e) = doc.restore_state(&after) {
            self.restore_failed(&description, e);
            return None;
        }

        let description = self.chain.step_forward()?;
        tracing::info!("Redo: {}", description);
        self.facade.did_redo(&description);
        self.bus.emit(EditorEvent::History(HistoryEvent::Redone {
            description: description.clone(),
        }));
        self.bus.emit(EditorEvent::Document(DocumentEvent::Reloaded));
        Some(description)
    }

    fn restore_failed(&mut self, description: &str, error: SnapshotError) {
        tracing::warn!("Could not restore '{}': {}", description, error);
        self.bus.emit(EditorEvent::Notice(NoticeEvent::RestoreFailed {
            action: description.to_string(),
            reason: error.to_string(),
        }));
    }

    pub fn clear(&mut self) {
        self.chain.clear();
        self.facade.did_clear();
        self.bus.emit(EditorEvent::History(HistoryEvent::Cleared));
    }
}

impl<D: DocumentModel> std::fmt::Debug for UndoRedoCoordinator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoRedoCoordinator")
            .field("undo_depth", &self.chain.undo_depth())
            .field("redo_depth", &self.chain.redo_depth())
            .field("host_enabled", &self.host_enabled)
            .field("session_active", &self.session_active)
            .finish()
    }
}
