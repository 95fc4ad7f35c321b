//! Identifiers for annotations and pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 1-based page number, matching the numbering used by PDF viewers.
pub type PageNumber = u32;

/// Stable identifier for an annotation.
///
/// Survives geometry and style edits as well as undo/redo restores, so
/// selections and history entries can refer to an annotation without
/// holding onto the annotation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Generate a new random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (e.g. read back from a saved document)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annot({})", &self.0.to_string()[..8])
    }
}

/// Non-owning reference to an annotation on a specific page.
///
/// The document owns annotations; everything else refers to them through
/// this id + page pair and looks them up when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationRef {
    pub id: AnnotationId,
    pub page: PageNumber,
}

impl AnnotationRef {
    pub fn new(id: AnnotationId, page: PageNumber) -> Self {
        Self { id, page }
    }
}

impl fmt::Display for AnnotationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on page {}", self.id, self.page)
    }
}
