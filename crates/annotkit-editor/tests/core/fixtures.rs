#![allow(dead_code)]

use annotkit_core::{AnnotationId, EditError, EventBus, PageNumber, Rect, SnapshotError};
use annotkit_editor::{
    Annotation, AnnotationType, DocumentModel, MemoryDocument, MemorySnapshot,
    PlatformUndoFacade, UndoRedoCoordinator,
};
use std::sync::{Arc, Mutex};

pub fn page() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 200.0)
}

/// One-page document holding a single annotation.
pub fn doc_with(kind: AnnotationType, rect: Rect) -> (MemoryDocument, AnnotationId) {
    let mut doc = MemoryDocument::with_pages(1, page());
    let annotation = Annotation::new(kind, 1, rect);
    let id = annotation.id;
    doc.add_annotation(annotation).expect("add annotation");
    (doc, id)
}

pub fn add(doc: &mut MemoryDocument, kind: AnnotationType, rect: Rect) -> AnnotationId {
    let annotation = Annotation::new(kind, 1, rect);
    let id = annotation.id;
    doc.add_annotation(annotation).expect("add annotation");
    id
}

pub fn rect_of<D: DocumentModel>(doc: &D, id: AnnotationId) -> Rect {
    doc.annotation(id, 1).expect("annotation exists").rect
}

pub fn coordinator<D: DocumentModel>() -> UndoRedoCoordinator<D> {
    UndoRedoCoordinator::new(100, Arc::new(EventBus::new()))
}

/// Facade that logs every hook call.
#[derive(Clone, Default)]
pub struct RecordingFacade {
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingFacade {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl PlatformUndoFacade for RecordingFacade {
    fn did_record(&mut self, description: &str) {
        self.calls.lock().expect("lock").push(format!("record {}", description));
    }

    fn did_undo(&mut self, description: &str) {
        self.calls.lock().expect("lock").push(format!("undo {}", description));
    }

    fn did_redo(&mut self, description: &str) {
        self.calls.lock().expect("lock").push(format!("redo {}", description));
    }

    fn did_clear(&mut self) {
        self.calls.lock().expect("lock").push("clear".to_string());
    }

    fn did_change_enabled(&mut self, enabled: bool) {
        self.calls.lock().expect("lock").push(format!("enabled {}", enabled));
    }
}

/// Memory document whose restores and updates can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyDocument {
    pub inner: MemoryDocument,
    pub fail_restore: bool,
    pub fail_update: bool,
}

impl DocumentModel for FlakyDocument {
    type Snapshot = MemorySnapshot;

    fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    fn crop_box(&self, page: PageNumber) -> Option<Rect> {
        self.inner.crop_box(page)
    }

    fn annotation(&self, id: AnnotationId, page: PageNumber) -> Option<Annotation> {
        self.inner.annotation(id, page)
    }

    fn annotations_on_page(&self, page: PageNumber) -> Vec<Annotation> {
        self.inner.annotations_on_page(page)
    }

    fn update_annotation(&mut self, annotation: &Annotation) -> Result<(), EditError> {
        if self.fail_update {
            return Err(EditError::Rejected {
                reason: "annotation is locked".to_string(),
            });
        }
        self.inner.update_annotation(annotation)
    }

    fn add_annotation(&mut self, annotation: Annotation) -> Result<(), EditError> {
        self.inner.add_annotation(annotation)
    }

    fn remove_annotation(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
    ) -> Result<Annotation, EditError> {
        self.inner.remove_annotation(id, page)
    }

    fn insert_page(&mut self, at: PageNumber, crop_box: Rect) -> Result<(), EditError> {
        self.inner.insert_page(at, crop_box)
    }

    fn move_page(&mut self, from: PageNumber, to: PageNumber) -> Result<(), EditError> {
        self.inner.move_page(from, to)
    }

    fn remove_page(&mut self, page: PageNumber) -> Result<(), EditError> {
        self.inner.remove_page(page)
    }

    fn set_form_field_value(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
        value: String,
    ) -> Result<(), EditError> {
        self.inner.set_form_field_value(id, page, value)
    }

    fn touch_page_content(&mut self, page: PageNumber) -> Result<(), EditError> {
        self.inner.touch_page_content(page)
    }

    fn capture_state(&self) -> Result<MemorySnapshot, SnapshotError> {
        self.inner.capture_state()
    }

    fn restore_state(&mut self, snapshot: &MemorySnapshot) -> Result<(), SnapshotError> {
        if self.fail_restore {
            return Err(SnapshotError::Restore {
                reason: "engine refused".to_string(),
            });
        }
        self.inner.restore_state(snapshot)
    }
}
