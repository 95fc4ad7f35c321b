//! Error handling for annotkit
//!
//! Error types for the editing layers:
//! - Edit errors (selection, geometry and style operations)
//! - Snapshot errors (capturing or restoring undo state)
//!
//! Edit errors are recovered where they occur and only logged; snapshot
//! errors are surfaced to the user as notices. All error types use
//! `thiserror`.

use thiserror::Error;

use crate::ids::{AnnotationId, PageNumber};

/// Edit error type
///
/// Raised by selection, transform and style operations. Gesture entry
/// points recover from these locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Operation needs a selection but nothing is selected
    #[error("No annotation is selected")]
    InvalidSelection,

    /// Candidate geometry collapsed below a usable size
    #[error("Degenerate geometry {width}x{height}")]
    OutOfBoundsGeometry {
        /// Candidate width before clamping.
        width: f64,
        /// Candidate height before clamping.
        height: f64,
    },

    /// Annotation type cannot be edited with this tool
    #[error("Annotation type {kind} is not editable")]
    UnsupportedAnnotationType {
        /// Name of the annotation type.
        kind: String,
    },

    /// Page number outside the document
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// The requested page.
        page: PageNumber,
        /// Number of pages in the document.
        page_count: u32,
    },

    /// Annotation is not on the given page
    #[error("Annotation {id} not found on page {page}")]
    AnnotationNotFound {
        /// The annotation that was looked up.
        id: AnnotationId,
        /// The page it was looked up on.
        page: PageNumber,
    },

    /// Transform call without an open session
    #[error("No transform session is active")]
    NoTransformSession,

    /// The delegate or a capability check refused the operation
    #[error("Edit rejected: {reason}")]
    Rejected {
        /// Why the edit was refused.
        reason: String,
    },
}

/// Snapshot error type
///
/// Failures while capturing or restoring document state for undo.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Document state could not be captured
    #[error("Snapshot capture failed: {reason}")]
    Capture {
        /// The reason the capture failed.
        reason: String,
    },

    /// Captured state could not be restored
    #[error("Snapshot restore failed: {reason}")]
    Restore {
        /// The reason the restore failed.
        reason: String,
    },
}

/// Main error type for annotkit
#[derive(Error, Debug)]
pub enum Error {
    /// Edit error
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an edit error
    pub fn is_edit_error(&self) -> bool {
        matches!(self, Error::Edit(_))
    }

    /// Check if this is a snapshot error
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, Error::Snapshot(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
