//! Tool manager
//!
//! Owns the document, the edit controller and the undo coordinator, and
//! routes gestures and platform requests between them. Document mutations
//! that do not come from a transform go through here so each one records an
//! undo snapshot first.

use annotkit_core::event_bus::{DocumentEvent, EditorEvent, EventBus};
use annotkit_core::{AnnotationId, EditError, PageNumber, Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationStyle, Color};
use crate::document::DocumentModel;
use crate::edit_controller::{AnnotationEditController, EditorOptions};
use crate::transform::TransformMode;
use crate::undo::{PlatformRequest, UndoRedoCoordinator};

/// Pointer input in page space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Tap to select the annotation under the point.
    Tap { page: PageNumber, point: Point },
    /// Drag began; a handle under the point resizes, the frame body moves.
    Began(Point),
    /// Rotation drag began.
    RotationBegan(Point),
    Changed(Point),
    Ended(Point),
    Cancelled,
}

/// Wiring between document, edit controller and undo coordinator
pub struct ToolManager<D: DocumentModel> {
    document: D,
    controller: AnnotationEditController,
    undo: UndoRedoCoordinator<D>,
    bus: Arc<EventBus>,
}

impl<D: DocumentModel> ToolManager<D> {
    pub fn new(document: D, options: EditorOptions, max_undo_depth: usize) -> Self {
        Self::with_bus(document, options, max_undo_depth, Arc::new(EventBus::new()))
    }

    pub fn with_bus(
        document: D,
        options: EditorOptions,
        max_undo_depth: usize,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            document,
            controller: AnnotationEditController::new(options, bus.clone()),
            undo: UndoRedoCoordinator::new(max_undo_depth, bus.clone()),
            bus,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub fn controller(&self) -> &AnnotationEditController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnnotationEditController {
        &mut self.controller
    }

    pub fn undo_coordinator(&self) -> &UndoRedoCoordinator<D> {
        &self.undo
    }

    pub fn undo_coordinator_mut(&mut self) -> &mut UndoRedoCoordinator<D> {
        &mut self.undo
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Route a gesture. Returns true when it changed editor state.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> bool {
        match event {
            GestureEvent::Tap { page, point } => {
                self.cancel_session();
                self.controller.select_at(&self.document, page, point).is_some()
            }
            GestureEvent::Began(point) => match self.mode_at(point) {
                Some(mode) => self.begin(mode, point),
                None => {
                    tracing::debug!("Drag at ({:.1}, {:.1}) missed the selection", point.x, point.y);
                    false
                }
            },
            GestureEvent::RotationBegan(point) => self.begin(TransformMode::Rotate, point),
            GestureEvent::Changed(point) => self.controller.update_transform(point).is_some(),
            GestureEvent::Ended(point) => {
                if self.controller.session().is_none() {
                    return false;
                }
                self.controller.update_transform(point);
                self.undo.set_session_active(false);
                self.controller
                    .commit_transform(&mut self.document, &mut self.undo)
            }
            GestureEvent::Cancelled => self.cancel_session(),
        }
    }

    fn mode_at(&self, point: Point) -> Option<TransformMode> {
        let layout = self.controller.handle_layout()?;
        let tolerance = self.controller.options().hit_radius();
        if let Some(handle) = layout.hit_test(&point, tolerance) {
            return Some(TransformMode::Resize(handle));
        }
        layout
            .frame_contains(&point, 0.0)
            .then_some(TransformMode::Move)
    }

    fn begin(&mut self, mode: TransformMode, point: Point) -> bool {
        let started = self.controller.begin_transform(&self.document, mode, point);
        if started {
            self.undo.set_session_active(true);
        }
        started
    }

    fn cancel_session(&mut self) -> bool {
        let had_session = self.controller.session().is_some();
        self.controller.cancel_transform();
        self.undo.set_session_active(false);
        had_session
    }

    pub fn select_annotation(&mut self, id: AnnotationId, page: PageNumber) -> bool {
        self.cancel_session();
        self.controller.select_annotation(&self.document, id, page)
    }

    pub fn deselect_annotation(&mut self) {
        self.controller.deselect_annotation();
        self.undo.set_session_active(false);
    }

    pub fn set_annotation_opacity(&mut self, opacity: f64) -> bool {
        self.controller
            .set_annotation_opacity(&mut self.document, &mut self.undo, opacity)
    }

    pub fn set_annotation_border(&mut self, thickness: f64) -> bool {
        self.controller
            .set_annotation_border(&mut self.document, &mut self.undo, thickness)
    }

    pub fn set_annotation_color(&mut self, color: Color) -> bool {
        self.controller
            .set_annotation_color(&mut self.document, &mut self.undo, color)
    }

    pub fn commit_selected_annotation_style(&mut self, style: AnnotationStyle) -> bool {
        self.controller
            .commit_selected_annotation_style(&mut self.document, &mut self.undo, style)
    }

    pub fn add_annotation(&mut self, annotation: Annotation) -> Result<(), EditError> {
        let page = annotation.page;
        let rect = annotation.rect;
        let kind = annotation.kind;
        self.perform(
            |undo, doc| undo.annotation_added(doc, kind),
            |doc| doc.add_annotation(annotation),
        )?;
        self.region_changed(page, rect);
        Ok(())
    }

    pub fn remove_annotation(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
    ) -> Result<Annotation, EditError> {
        let kind = self
            .document
            .annotation(id, page)
            .ok_or(EditError::AnnotationNotFound { id, page })?
            .kind;
        let removed = self.perform(
            |undo, doc| undo.annotation_removed(doc, kind),
            |doc| doc.remove_annotation(id, page),
        )?;
        self.controller.refresh_selection(&self.document);
        self.region_changed(page, removed.rect);
        Ok(removed)
    }

    pub fn set_form_field_value(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let value = value.into();
        self.perform(
            |undo, doc| undo.form_field_data_modified(doc),
            |doc| doc.set_form_field_value(id, page, value),
        )?;
        if let Some(field) = self.document.annotation(id, page) {
            self.region_changed(page, field.rect);
        }
        Ok(())
    }

    pub fn insert_page(&mut self, at: PageNumber, crop_box: Rect) -> Result<(), EditError> {
        self.deselect_annotation();
        self.perform(
            |undo, doc| undo.page_added(doc, at),
            |doc| doc.insert_page(at, crop_box),
        )?;
        self.page_changed(at);
        Ok(())
    }

    pub fn move_page(&mut self, from: PageNumber, to: PageNumber) -> Result<(), EditError> {
        self.deselect_annotation();
        self.perform(
            |undo, doc| undo.page_moved(doc, from, to),
            |doc| doc.move_page(from, to),
        )?;
        self.page_changed(from);
        self.page_changed(to);
        Ok(())
    }

    pub fn remove_page(&mut self, page: PageNumber) -> Result<(), EditError> {
        self.deselect_annotation();
        self.perform(
            |undo, doc| undo.page_removed(doc, page),
            |doc| doc.remove_page(page),
        )?;
        self.bus.emit(EditorEvent::Document(DocumentEvent::Reloaded));
        Ok(())
    }

    pub fn modify_page_content(&mut self, page: PageNumber) -> Result<(), EditError> {
        self.perform(
            |undo, doc| undo.page_content_modified(doc, page),
            |doc| doc.touch_page_content(page),
        )?;
        self.page_changed(page);
        Ok(())
    }

    /// Record a snapshot, then apply the mutation. The entry is discarded
    /// again if the mutation fails.
    fn perform<T>(
        &mut self,
        record: impl FnOnce(&mut UndoRedoCoordinator<D>, &D) -> bool,
        apply: impl FnOnce(&mut D) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let recorded = record(&mut self.undo, &self.document);
        match apply(&mut self.document) {
            Ok(value) => Ok(value),
            Err(e) => {
                if recorded {
                    self.undo.discard_last();
                }
                tracing::debug!("Document change failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn undo(&mut self) -> Option<String> {
        let description = self.undo.undo(&mut self.document)?;
        self.controller.refresh_selection(&self.document);
        Some(description)
    }

    pub fn redo(&mut self) -> Option<String> {
        let description = self.undo.redo(&mut self.document)?;
        self.controller.refresh_selection(&self.document);
        Some(description)
    }

    /// Entry point for undo/redo coming from the platform undo manager.
    pub fn handle_platform_request(&mut self, request: PlatformRequest) -> Option<String> {
        match request {
            PlatformRequest::Undo => self.undo(),
            PlatformRequest::Redo => self.redo(),
        }
    }

    fn region_changed(&self, page: PageNumber, rect: Rect) {
        self.bus
            .emit(EditorEvent::Document(DocumentEvent::RegionChanged { page, rect }));
    }

    fn page_changed(&self, page: PageNumber) {
        self.bus
            .emit(EditorEvent::Document(DocumentEvent::PageChanged { page }));
    }
}

impl<D: DocumentModel + std::fmt::Debug> std::fmt::Debug for ToolManager<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolManager")
            .field("document", &self.document)
            .field("controller", &self.controller)
            .field("undo", &self.undo)
            .finish()
    }
}
