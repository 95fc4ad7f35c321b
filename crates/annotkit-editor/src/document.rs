//! Document model interface
//!
//! The editor never owns annotations. It reads and writes them through this
//! trait, which a host implements on top of its PDF engine.

use annotkit_core::{AnnotationId, EditError, PageNumber, Rect, SnapshotError};

use crate::annotation::Annotation;

/// Everything the edit controller and undo coordinator need from a document.
pub trait DocumentModel {
    /// Restorable capture of the whole document state.
    type Snapshot: Clone;

    fn page_count(&self) -> u32;

    /// Crop box of a 1-based page, or `None` when out of range.
    fn crop_box(&self, page: PageNumber) -> Option<Rect>;

    fn annotation(&self, id: AnnotationId, page: PageNumber) -> Option<Annotation>;

    fn annotations_on_page(&self, page: PageNumber) -> Vec<Annotation>;

    /// Replace the stored annotation with the same id and page.
    fn update_annotation(&mut self, annotation: &Annotation) -> Result<(), EditError>;

    fn add_annotation(&mut self, annotation: Annotation) -> Result<(), EditError>;

    fn remove_annotation(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
    ) -> Result<Annotation, EditError>;

    /// Insert a page before `at` (or append when `at` is one past the end).
    fn insert_page(&mut self, at: PageNumber, crop_box: Rect) -> Result<(), EditError>;

    fn move_page(&mut self, from: PageNumber, to: PageNumber) -> Result<(), EditError>;

    fn remove_page(&mut self, page: PageNumber) -> Result<(), EditError>;

    fn set_form_field_value(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
        value: String,
    ) -> Result<(), EditError>;

    /// Mark page content (not annotations) as changed.
    fn touch_page_content(&mut self, page: PageNumber) -> Result<(), EditError>;

    fn capture_state(&self) -> Result<Self::Snapshot, SnapshotError>;

    fn restore_state(&mut self, snapshot: &Self::Snapshot) -> Result<(), SnapshotError>;

    /// Check `page` against the page count.
    fn check_page(&self, page: PageNumber) -> Result<Rect, EditError> {
        self.crop_box(page).ok_or(EditError::PageOutOfRange {
            page,
            page_count: self.page_count(),
        })
    }
}
