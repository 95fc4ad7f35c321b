//! In-memory document
//!
//! A `DocumentModel` backed by plain vectors. Used by the replay tool and
//! the tests, and as a reference for hosts wiring their own engine.
//! Snapshots are the JSON encoding of the page list.

use annotkit_core::{AnnotationId, EditError, PageNumber, Rect, SnapshotError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationType};
use crate::document::DocumentModel;

/// A page and the annotations on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub crop_box: Rect,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Bumped whenever page content (not annotations) changes.
    #[serde(default)]
    pub content_revision: u64,
}

impl Page {
    pub fn new(crop_box: Rect) -> Self {
        Self {
            crop_box,
            annotations: Vec::new(),
            content_revision: 0,
        }
    }
}

/// Serialized page list captured for undo
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySnapshot {
    bytes: Arc<[u8]>,
}

impl MemorySnapshot {
    /// Wrap previously captured bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Document held entirely in memory
///
/// Deserializing renumbers every annotation after the page it is stored on,
/// whatever `page` the input carried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoredDocument")]
pub struct MemoryDocument {
    pages: Vec<Page>,
    /// Largest snapshot, in bytes, that `capture_state` will produce.
    #[serde(skip)]
    snapshot_budget: Option<usize>,
}

#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    pages: Vec<Page>,
}

impl From<StoredDocument> for MemoryDocument {
    fn from(stored: StoredDocument) -> Self {
        let mut doc = Self {
            pages: stored.pages,
            snapshot_budget: None,
        };
        doc.renumber();
        doc
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with `count` pages sharing one crop box.
    pub fn with_pages(count: u32, crop_box: Rect) -> Self {
        Self {
            pages: (0..count).map(|_| Page::new(crop_box)).collect(),
            snapshot_budget: None,
        }
    }

    pub fn from_json(json: &str) -> annotkit_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> annotkit_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Limit snapshot size; captures above the limit fail.
    pub fn set_snapshot_budget(&mut self, budget: Option<usize>) {
        self.snapshot_budget = budget;
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn page_index(&self, page: PageNumber) -> Result<usize, EditError> {
        let index = (page as usize).wrapping_sub(1);
        if index < self.pages.len() {
            Ok(index)
        } else {
            Err(self.out_of_range(page))
        }
    }

    fn out_of_range(&self, page: PageNumber) -> EditError {
        EditError::PageOutOfRange {
            page,
            page_count: self.page_count(),
        }
    }

    fn find_mut(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
    ) -> Result<&mut Annotation, EditError> {
        let index = self.page_index(page)?;
        self.pages[index]
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(EditError::AnnotationNotFound { id, page })
    }

    // Page numbers on annotations follow the page order.
    fn renumber(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            let number = index as PageNumber + 1;
            for annotation in &mut page.annotations {
                annotation.page = number;
            }
        }
    }
}

impl DocumentModel for MemoryDocument {
    type Snapshot = MemorySnapshot;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn crop_box(&self, page: PageNumber) -> Option<Rect> {
        self.page_index(page).ok().map(|i| self.pages[i].crop_box)
    }

    fn annotation(&self, id: AnnotationId, page: PageNumber) -> Option<Annotation> {
        let index = self.page_index(page).ok()?;
        self.pages[index]
            .annotations
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    fn annotations_on_page(&self, page: PageNumber) -> Vec<Annotation> {
        self.page_index(page)
            .map(|i| self.pages[i].annotations.clone())
            .unwrap_or_default()
    }

    fn update_annotation(&mut self, annotation: &Annotation) -> Result<(), EditError> {
        let stored = self.find_mut(annotation.id, annotation.page)?;
        *stored = annotation.clone();
        Ok(())
    }

    fn add_annotation(&mut self, annotation: Annotation) -> Result<(), EditError> {
        let index = self.page_index(annotation.page)?;
        self.pages[index].annotations.push(annotation);
        Ok(())
    }

    fn remove_annotation(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
    ) -> Result<Annotation, EditError> {
        let index = self.page_index(page)?;
        let annotations = &mut self.pages[index].annotations;
        let position = annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(EditError::AnnotationNotFound { id, page })?;
        Ok(annotations.remove(position))
    }

    fn insert_page(&mut self, at: PageNumber, crop_box: Rect) -> Result<(), EditError> {
        let index = (at as usize).wrapping_sub(1);
        if index > self.pages.len() {
            return Err(self.out_of_range(at));
        }
        self.pages.insert(index, Page::new(crop_box));
        self.renumber();
        Ok(())
    }

    fn move_page(&mut self, from: PageNumber, to: PageNumber) -> Result<(), EditError> {
        let from_index = self.page_index(from)?;
        let to_index = self.page_index(to)?;
        let page = self.pages.remove(from_index);
        self.pages.insert(to_index, page);
        self.renumber();
        Ok(())
    }

    fn remove_page(&mut self, page: PageNumber) -> Result<(), EditError> {
        let index = self.page_index(page)?;
        self.pages.remove(index);
        self.renumber();
        Ok(())
    }

    fn set_form_field_value(
        &mut self,
        id: AnnotationId,
        page: PageNumber,
        value: String,
    ) -> Result<(), EditError> {
        let field = self.find_mut(id, page)?;
        if field.kind != AnnotationType::Widget {
            return Err(EditError::UnsupportedAnnotationType {
                kind: field.kind.to_string(),
            });
        }
        field.contents = Some(value);
        Ok(())
    }

    fn touch_page_content(&mut self, page: PageNumber) -> Result<(), EditError> {
        let index = self.page_index(page)?;
        self.pages[index].content_revision += 1;
        Ok(())
    }

    fn capture_state(&self) -> Result<MemorySnapshot, SnapshotError> {
        let bytes = serde_json::to_vec(&self.pages).map_err(|e| SnapshotError::Capture {
            reason: e.to_string(),
        })?;
        if let Some(budget) = self.snapshot_budget {
            if bytes.len() > budget {
                return Err(SnapshotError::Capture {
                    reason: format!(
                        "snapshot of {} bytes exceeds budget of {} bytes",
                        bytes.len(),
                        budget
                    ),
                });
            }
        }
        Ok(MemorySnapshot::from_bytes(bytes))
    }

    fn restore_state(&mut self, snapshot: &MemorySnapshot) -> Result<(), SnapshotError> {
        let pages: Vec<Page> =
            serde_json::from_slice(&snapshot.bytes).map_err(|e| SnapshotError::Restore {
                reason: e.to_string(),
            })?;
        self.pages = pages;
        Ok(())
    }
}
