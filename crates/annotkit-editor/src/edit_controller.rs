//! Annotation edit controller
//!
//! Owns the selection and the open transform session. Reads and writes the
//! document only through `DocumentModel`, and records every committed change
//! with the undo coordinator before applying it.
//!
//! State machine:
//!
//! ```text
//! Idle -> Selecting -> Selected -> Transforming -> Selected (commit / cancel)
//!                      Selected -> Idle (deselect)
//! ```

use annotkit_core::bounds::{bound_point_to_rect, bound_rect_to_page, BoundsMode};
use annotkit_core::event_bus::{
    DocumentEvent, EditorEvent, EventBus, SelectionEvent, TransformEvent,
};
use annotkit_core::{AnnotationId, AnnotationRef, EditError, PageNumber, Point, Rect};
use std::sync::Arc;

use crate::annotation::{normalize_degrees, Annotation, AnnotationStyle, AnnotationType, Color};
use crate::document::DocumentModel;
use crate::selection::{HandleLayout, SelectionSet};
use crate::transform::{AspectGuide, TransformConstraints, TransformMode, TransformSession};
use crate::undo::UndoRedoCoordinator;

/// Where the controller is in its edit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    /// A selection request is being validated.
    Selecting,
    Selected,
    Transforming,
}

/// Host hooks into the edit cycle. Every method has a default.
pub trait EditDelegate {
    /// Veto a selection.
    fn should_select(&mut self, _annotation: &Annotation) -> bool {
        true
    }

    /// Whether the annotation should be redrawn live from vector data while
    /// it is transformed, instead of as a cached bitmap.
    fn should_render_as_vector(&self, annotation: &Annotation) -> bool {
        annotation.kind.has_vector_appearance()
    }

    fn did_begin_editing_free_text(&mut self, _annotation: &Annotation) {}

    /// Called after a geometry or style change has been written to the
    /// document.
    fn did_commit_change(&mut self, _annotations: &[AnnotationRef]) {}
}

/// Delegate that accepts everything
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDelegate;

impl EditDelegate for DefaultDelegate {}

/// Tunables for the edit tool
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    /// Minimum width and height; 0 means none.
    pub minimum_annotation_size: f64,
    pub maximum_annotation_size: Option<f64>,
    pub aspect_ratio_guide_enabled: bool,
    /// Types whose aspect ratio is locked unless overridden.
    pub aspect_locked_types: Vec<AnnotationType>,
    /// Drawn handle size, in page units.
    pub handle_size: f64,
    /// Extra hit radius around handles, in page units.
    pub handle_tolerance: f64,
}

impl EditorOptions {
    /// Distance from a handle center that still grabs the handle: the
    /// tolerance, or half the drawn handle when that is larger.
    pub fn hit_radius(&self) -> f64 {
        self.handle_tolerance.max(self.handle_size / 2.0)
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            minimum_annotation_size: 0.0,
            maximum_annotation_size: None,
            aspect_ratio_guide_enabled: true,
            aspect_locked_types: AnnotationType::ALL
                .into_iter()
                .filter(AnnotationType::locks_aspect_ratio_by_default)
                .collect(),
            handle_size: 6.0,
            handle_tolerance: 8.0,
        }
    }
}

/// Selection and transform state machine for annotations
pub struct AnnotationEditController {
    state: EditState,
    selection: SelectionSet,
    layout: Option<HandleLayout>,
    session: Option<TransformSession>,
    options: EditorOptions,
    maintain_aspect_ratio: Option<bool>,
    delegate: Box<dyn EditDelegate>,
    bus: Arc<EventBus>,
}

impl AnnotationEditController {
    pub fn new(options: EditorOptions, bus: Arc<EventBus>) -> Self {
        Self {
            state: EditState::Idle,
            selection: SelectionSet::new(),
            layout: None,
            session: None,
            options,
            maintain_aspect_ratio: None,
            delegate: Box::new(DefaultDelegate),
            bus,
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn EditDelegate>) {
        self.delegate = delegate;
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EditorOptions) {
        self.options = options;
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_annotations(&self) -> Vec<AnnotationRef> {
        self.selection.to_vec()
    }

    pub fn handle_layout(&self) -> Option<&HandleLayout> {
        self.layout.as_ref()
    }

    pub fn session(&self) -> Option<&TransformSession> {
        self.session.as_ref()
    }

    /// Force the aspect lock on or off; `None` falls back to the per-type
    /// default.
    pub fn set_maintain_aspect_ratio(&mut self, value: Option<bool>) {
        self.maintain_aspect_ratio = value;
    }

    /// Whether resizing the current selection keeps its aspect ratio.
    pub fn maintain_aspect_ratio<D: DocumentModel>(&self, doc: &D) -> bool {
        if let Some(value) = self.maintain_aspect_ratio {
            return value;
        }
        self.selected(doc)
            .iter()
            .any(|a| self.options.aspect_locked_types.contains(&a.kind))
    }

    /// Select a single annotation, replacing the current selection.
    ///
    /// Returns false when the page is out of range, the annotation is not on
    /// that page, its type cannot be edited, or the delegate refuses it.
    pub fn select_annotation<D: DocumentModel>(
        &mut self,
        doc: &D,
        id: AnnotationId,
        page: PageNumber,
    ) -> bool {
        let previous = self.state;
        self.state = EditState::Selecting;
        match self.validate(doc, AnnotationRef::new(id, page)) {
            Ok(annotation) => {
                self.session = None;
                self.selection.clear();
                self.selection.insert(annotation.reference());
                self.selection_changed(doc);
                true
            }
            Err(e) => {
                tracing::debug!("Selection of {} on page {} refused: {}", id, page, e);
                self.state = previous;
                false
            }
        }
    }

    /// Replace the selection with every acceptable annotation in `refs`.
    ///
    /// Annotations that fail validation or live on a different page than
    /// the first accepted one are skipped. Returns false if none was
    /// accepted, in which case the selection is cleared.
    pub fn set_selected_annotations<D: DocumentModel>(
        &mut self,
        doc: &D,
        refs: &[AnnotationRef],
    ) -> bool {
        self.state = EditState::Selecting;
        self.session = None;
        self.selection.clear();
        for r in refs {
            match self.validate(doc, *r) {
                Ok(annotation) => {
                    if !self.selection.insert(annotation.reference()) {
                        tracing::debug!("Skipping {} for a single-page selection", r);
                    }
                }
                Err(e) => tracing::debug!("Skipping {}: {}", r, e),
            }
        }
        if self.selection.is_empty() {
            self.state = EditState::Idle;
            self.layout = None;
            self.bus.emit(EditorEvent::Selection(SelectionEvent::Cleared));
            return false;
        }
        self.selection_changed(doc);
        true
    }

    /// Select the topmost editable annotation under `point`, or clear the
    /// selection when there is none.
    pub fn select_at<D: DocumentModel>(
        &mut self,
        doc: &D,
        page: PageNumber,
        point: Point,
    ) -> Option<AnnotationId> {
        let tolerance = self.options.handle_tolerance / 2.0;
        let hit = doc
            .annotations_on_page(page)
            .into_iter()
            .rev()
            .filter(|a| a.kind.is_editable())
            .find(|a| a.rect.inset(-tolerance).contains_point(&point));

        match hit {
            Some(annotation) if self.select_annotation(doc, annotation.id, page) => {
                Some(annotation.id)
            }
            _ => {
                self.deselect_annotation();
                None
            }
        }
    }

    /// Clear the selection and drop any open session. Idempotent.
    pub fn deselect_annotation(&mut self) {
        if let Some(session) = self.session.take() {
            self.bus
                .emit(EditorEvent::Transform(TransformEvent::Cancelled {
                    page: session.page(),
                }));
        }
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        self.layout = None;
        self.state = EditState::Idle;
        if had_selection {
            self.bus.emit(EditorEvent::Selection(SelectionEvent::Cleared));
        }
    }

    /// Drop selected annotations that no longer exist (after undo, redo or
    /// page operations) and re-layout the handles.
    pub fn refresh_selection<D: DocumentModel>(&mut self, doc: &D) {
        if self.selection.is_empty() {
            return;
        }
        let stale: Vec<AnnotationRef> = self
            .selection
            .iter()
            .filter(|r| doc.annotation(r.id, r.page).is_none())
            .copied()
            .collect();
        for r in &stale {
            self.selection.remove(r);
        }
        if self.selection.is_empty() {
            self.deselect_annotation();
        } else {
            self.session = None;
            self.selection_changed(doc);
        }
    }

    /// Union of the selected annotations' rectangles.
    pub fn selection_frame<D: DocumentModel>(&self, doc: &D) -> Option<Rect> {
        self.selected(doc)
            .iter()
            .map(|a| a.rect)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Open a transform session. Silently does nothing (returning false)
    /// when the selection is empty or does not support the mode.
    pub fn begin_transform<D: DocumentModel>(
        &mut self,
        doc: &D,
        mode: TransformMode,
        start: Point,
    ) -> bool {
        match self.try_begin(doc, mode, start) {
            Ok(session) => {
                self.bus
                    .emit(EditorEvent::Transform(TransformEvent::Began {
                        page: session.page(),
                        frame: session.original_frame(),
                    }));
                self.session = Some(session);
                self.state = EditState::Transforming;
                true
            }
            Err(e) => {
                tracing::debug!("Transform {:?} not started: {}", mode, e);
                false
            }
        }
    }

    fn try_begin<D: DocumentModel>(
        &self,
        doc: &D,
        mode: TransformMode,
        start: Point,
    ) -> Result<TransformSession, EditError> {
        if self.session.is_some() {
            return Err(EditError::Rejected {
                reason: "a transform is already in progress".to_string(),
            });
        }
        let page = self.selection.page().ok_or(EditError::InvalidSelection)?;
        let selected = self.selected(doc);
        if selected.is_empty() {
            return Err(EditError::InvalidSelection);
        }

        let locked = self.maintain_aspect_ratio(doc);
        let refuse = |kind: &AnnotationType, what: &str| EditError::Rejected {
            reason: format!("{} annotations cannot be {}", kind, what),
        };
        for annotation in &selected {
            let kind = &annotation.kind;
            match mode {
                TransformMode::Move if !kind.is_movable() => return Err(refuse(kind, "moved")),
                TransformMode::Resize(_) if !kind.is_resizable() => {
                    return Err(refuse(kind, "resized"))
                }
                TransformMode::Rotate if !kind.is_rotatable() => {
                    return Err(refuse(kind, "rotated"))
                }
                _ => {}
            }
        }
        if let TransformMode::Resize(handle) = mode {
            if locked && !handle.is_corner() {
                return Err(EditError::Rejected {
                    reason: format!(
                        "{:?} handle is unavailable while the aspect ratio is locked",
                        handle
                    ),
                });
            }
        }

        let crop_box = doc.check_page(page)?;
        let frame = self.selection_frame(doc).ok_or(EditError::InvalidSelection)?;
        let constraints = TransformConstraints {
            maintain_aspect_ratio: locked,
            minimum_size: self.options.minimum_annotation_size,
            maximum_size: self.options.maximum_annotation_size,
            aspect_ratio_guide: self.options.aspect_ratio_guide_enabled,
        };
        Ok(TransformSession::new(
            mode,
            page,
            crop_box,
            frame,
            start,
            constraints,
        ))
    }

    /// Feed a gesture point to the open session and return the new,
    /// page-bounded candidate.
    pub fn update_transform(&mut self, point: Point) -> Option<Rect> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("{}", EditError::NoTransformSession);
            return None;
        };
        let candidate = session.update(point);
        let page = session.page();
        self.bus
            .emit(EditorEvent::Transform(TransformEvent::Updated { page, candidate }));
        Some(candidate)
    }

    /// Guide line for the open session, if one should be drawn.
    pub fn aspect_guide(&self) -> Option<AspectGuide> {
        self.session.as_ref().and_then(|s| s.aspect_guide())
    }

    /// Apply the latest candidate to every selected annotation.
    ///
    /// Records one undo snapshot for the whole commit. A session that never
    /// changed anything closes without touching the document or the undo
    /// chain.
    pub fn commit_transform<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
    ) -> bool {
        let Some(session) = self.session.take() else {
            tracing::debug!("Commit ignored: {}", EditError::NoTransformSession);
            return false;
        };
        self.state = EditState::Selected;
        let page = session.page();

        if session.is_noop() {
            tracing::debug!("Transform on page {} changed nothing", page);
            self.bus
                .emit(EditorEvent::Transform(TransformEvent::Cancelled { page }));
            return false;
        }

        let updated: Vec<Annotation> = self
            .selected(doc)
            .into_iter()
            .map(|mut annotation| {
                match session.mode() {
                    TransformMode::Rotate => {
                        annotation.rotation =
                            normalize_degrees(annotation.rotation + session.rotation_delta());
                    }
                    TransformMode::Move | TransformMode::Resize(_) => {
                        annotation.rect = session.map_member(&annotation.rect);
                    }
                }
                annotation
            })
            .collect();

        let verb = match session.mode() {
            TransformMode::Move => "Move",
            TransformMode::Resize(_) => "Resize",
            TransformMode::Rotate => "Rotate",
        };
        let recorded = undo.annotation_modified(doc, &describe(verb, updated.len()));
        let written = self.write_back(doc, &updated);
        if written.is_empty() {
            if recorded {
                undo.discard_last();
            }
            tracing::debug!("Transform on page {} was not written back", page);
            self.bus
                .emit(EditorEvent::Transform(TransformEvent::Cancelled { page }));
            return false;
        }

        let frame = session.candidate();
        tracing::info!("{} committed on page {}", describe(verb, written.len()), page);
        self.bus.emit(EditorEvent::Document(DocumentEvent::RegionChanged {
            page,
            rect: session.original_frame().union(&frame),
        }));
        self.bus
            .emit(EditorEvent::Transform(TransformEvent::Committed { page, frame }));
        self.delegate.did_commit_change(&written);
        self.selection_changed(doc);
        true
    }

    /// Discard the open session; the document is left untouched.
    pub fn cancel_transform(&mut self) {
        if let Some(session) = self.session.take() {
            self.state = EditState::Selected;
            self.bus
                .emit(EditorEvent::Transform(TransformEvent::Cancelled {
                    page: session.page(),
                }));
        }
    }

    /// Set the opacity of every selected annotation, clamped to `[0, 1]`.
    pub fn set_annotation_opacity<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
        opacity: f64,
    ) -> bool {
        if !opacity.is_finite() {
            tracing::debug!("Ignoring non-finite opacity {}", opacity);
            return false;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        self.apply_style(doc, undo, "Change opacity", |style| style.opacity = opacity)
    }

    /// Set the border thickness of every selected annotation.
    pub fn set_annotation_border<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
        thickness: f64,
    ) -> bool {
        if !thickness.is_finite() {
            tracing::debug!("Ignoring non-finite thickness {}", thickness);
            return false;
        }
        let thickness = thickness.max(0.0);
        self.apply_style(doc, undo, "Change border", |style| {
            style.thickness = thickness
        })
    }

    pub fn set_annotation_color<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
        color: Color,
    ) -> bool {
        self.apply_style(doc, undo, "Change color", |style| style.color = color)
    }

    /// Apply a complete style to the selection as one undoable change.
    pub fn commit_selected_annotation_style<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
        style: AnnotationStyle,
    ) -> bool {
        let style = AnnotationStyle {
            opacity: if style.opacity.is_finite() {
                style.opacity.clamp(0.0, 1.0)
            } else {
                1.0
            },
            thickness: if style.thickness.is_finite() {
                style.thickness.max(0.0)
            } else {
                0.0
            },
            ..style
        };
        self.apply_style(doc, undo, "Change style", |s| *s = style)
    }

    fn apply_style<D, F>(
        &mut self,
        doc: &mut D,
        undo: &mut UndoRedoCoordinator<D>,
        action: &str,
        change: F,
    ) -> bool
    where
        D: DocumentModel,
        F: Fn(&mut AnnotationStyle),
    {
        if self.selection.is_empty() {
            tracing::debug!("{} ignored: {}", action, EditError::InvalidSelection);
            return false;
        }
        if self.session.is_some() {
            tracing::debug!("{} ignored while a transform is in progress", action);
            return false;
        }

        let updated: Vec<Annotation> = self
            .selected(doc)
            .into_iter()
            .map(|mut annotation| {
                change(&mut annotation.style);
                annotation
            })
            .collect();
        if updated.is_empty() {
            return false;
        }

        let recorded = undo.annotation_modified(doc, action);
        let written = self.write_back(doc, &updated);
        if written.is_empty() {
            if recorded {
                undo.discard_last();
            }
            tracing::debug!("{} was not written back", action);
            return false;
        }
        if let (Some(page), Some(frame)) = (self.selection.page(), self.selection_frame(doc)) {
            self.bus.emit(EditorEvent::Document(DocumentEvent::RegionChanged {
                page,
                rect: frame,
            }));
        }
        tracing::info!("{} applied to {} annotation(s)", action, written.len());
        self.delegate.did_commit_change(&written);
        true
    }

    /// Hand a selected free text annotation to the delegate for text editing.
    pub fn edit_selected_free_text<D: DocumentModel>(&mut self, doc: &D) -> bool {
        let selected = self.selected(doc);
        match selected.as_slice() {
            [annotation] if annotation.kind == AnnotationType::FreeText => {
                self.delegate.did_begin_editing_free_text(annotation);
                true
            }
            _ => false,
        }
    }

    pub fn should_render_as_vector<D: DocumentModel>(
        &self,
        doc: &D,
        annotation: AnnotationRef,
    ) -> bool {
        doc.annotation(annotation.id, annotation.page)
            .is_some_and(|a| self.delegate.should_render_as_vector(&a))
    }

    /// Clamp a point into the crop box of the selection's page. Returned
    /// unchanged when nothing is selected.
    pub fn bound_point_to_page<D: DocumentModel>(&self, doc: &D, point: Point) -> Point {
        match self.selection.page().and_then(|p| doc.crop_box(p)) {
            Some(crop) => bound_point_to_rect(point, &crop),
            None => point,
        }
    }

    /// Bring a page-space rectangle inside the given page by moving it.
    pub fn bound_page_rect<D: DocumentModel>(
        &self,
        doc: &D,
        rect: Rect,
        page: PageNumber,
    ) -> Result<Rect, EditError> {
        let crop = doc.check_page(page)?;
        Ok(bound_rect_to_page(&rect, &crop, BoundsMode::Moving))
    }

    /// Bound a proposed rectangle to the selection's page.
    pub fn bound_rect_to_page<D: DocumentModel>(
        &self,
        doc: &D,
        rect: Rect,
        resizing: bool,
    ) -> Rect {
        let mode = if resizing {
            BoundsMode::Resizing
        } else {
            BoundsMode::Moving
        };
        match self.selection.page().and_then(|p| doc.crop_box(p)) {
            Some(crop) => bound_rect_to_page(&rect, &crop, mode),
            None => rect,
        }
    }

    fn validate<D: DocumentModel>(
        &mut self,
        doc: &D,
        r: AnnotationRef,
    ) -> Result<Annotation, EditError> {
        doc.check_page(r.page)?;
        let annotation = doc
            .annotation(r.id, r.page)
            .ok_or(EditError::AnnotationNotFound {
                id: r.id,
                page: r.page,
            })?;
        if !annotation.kind.is_editable() {
            return Err(EditError::UnsupportedAnnotationType {
                kind: annotation.kind.to_string(),
            });
        }
        if !self.delegate.should_select(&annotation) {
            return Err(EditError::Rejected {
                reason: "delegate declined the selection".to_string(),
            });
        }
        Ok(annotation)
    }

    fn selected<D: DocumentModel>(&self, doc: &D) -> Vec<Annotation> {
        self.selection
            .iter()
            .filter_map(|r| doc.annotation(r.id, r.page))
            .collect()
    }

    fn write_back<D: DocumentModel>(
        &self,
        doc: &mut D,
        updated: &[Annotation],
    ) -> Vec<AnnotationRef> {
        updated
            .iter()
            .filter_map(|annotation| match doc.update_annotation(annotation) {
                Ok(()) => Some(annotation.reference()),
                Err(e) => {
                    tracing::debug!("Could not update {}: {}", annotation.reference(), e);
                    None
                }
            })
            .collect()
    }

    fn selection_changed<D: DocumentModel>(&mut self, doc: &D) {
        let selected = self.selected(doc);
        self.layout = self.selection_frame(doc).map(|frame| {
            let resizable = selected.iter().all(|a| a.kind.is_resizable());
            HandleLayout::compute(frame, resizable, self.maintain_aspect_ratio(doc))
        });
        self.state = if self.session.is_some() {
            EditState::Transforming
        } else {
            EditState::Selected
        };
        self.bus
            .emit(EditorEvent::Selection(SelectionEvent::Changed {
                selected: self.selection.to_vec(),
            }));
    }
}

impl std::fmt::Debug for AnnotationEditController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEditController")
            .field("state", &self.state)
            .field("selection", &self.selection)
            .field("session", &self.session)
            .field("options", &self.options)
            .finish()
    }
}

fn describe(verb: &str, count: usize) -> String {
    if count == 1 {
        format!("{} annotation", verb)
    } else {
        format!("{} {} annotations", verb, count)
    }
}
