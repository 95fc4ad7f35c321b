//! Event type definitions for the event bus.
//!
//! Events are grouped by category. They are cloneable and serializable so
//! hosts can log them or forward them to a rendering surface.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::ids::{AnnotationRef, PageNumber};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Selection set changes
    Selection(SelectionEvent),
    /// Transform session lifecycle
    Transform(TransformEvent),
    /// Document content changes
    Document(DocumentEvent),
    /// Undo/redo chain changes
    History(HistoryEvent),
    /// User-facing warnings
    Notice(NoticeEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Selection(_) => EventCategory::Selection,
            EditorEvent::Transform(_) => EventCategory::Transform,
            EditorEvent::Document(_) => EventCategory::Document,
            EditorEvent::History(_) => EventCategory::History,
            EditorEvent::Notice(_) => EventCategory::Notice,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Selection(e) => e.description(),
            EditorEvent::Transform(e) => e.description(),
            EditorEvent::Document(e) => e.description(),
            EditorEvent::History(e) => e.description(),
            EditorEvent::Notice(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection set events.
    Selection,
    /// Transform session events.
    Transform,
    /// Document content events.
    Document,
    /// Undo/redo events.
    History,
    /// Warnings surfaced to the user.
    Notice,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Transform => write!(f, "Transform"),
            EventCategory::Document => write!(f, "Document"),
            EventCategory::History => write!(f, "History"),
            EventCategory::Notice => write!(f, "Notice"),
        }
    }
}

/// Selection-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selection set was replaced.
    Changed {
        /// Annotations now selected, in selection order.
        selected: Vec<AnnotationRef>,
    },
    /// The selection was cleared.
    Cleared,
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { selected } => {
                format!("Selection changed ({} selected)", selected.len())
            }
            SelectionEvent::Cleared => "Selection cleared".to_string(),
        }
    }
}

/// Transform session events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformEvent {
    /// A session was opened.
    Began {
        /// Page of the selection.
        page: PageNumber,
        /// Selection frame at the start of the session.
        frame: Rect,
    },
    /// A new candidate was computed.
    Updated {
        /// Page of the selection.
        page: PageNumber,
        /// The bounded candidate frame.
        candidate: Rect,
    },
    /// The candidate was applied to the document.
    Committed {
        /// Page of the selection.
        page: PageNumber,
        /// The committed frame.
        frame: Rect,
    },
    /// The session was discarded.
    Cancelled {
        /// Page of the selection.
        page: PageNumber,
    },
}

impl TransformEvent {
    fn description(&self) -> String {
        match self {
            TransformEvent::Began { page, .. } => format!("Transform began on page {}", page),
            TransformEvent::Updated { page, candidate } => format!(
                "Transform candidate on page {}: {:.1}x{:.1}",
                page, candidate.width, candidate.height
            ),
            TransformEvent::Committed { page, .. } => {
                format!("Transform committed on page {}", page)
            }
            TransformEvent::Cancelled { page } => format!("Transform cancelled on page {}", page),
        }
    }
}

/// Document content events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A region of a page must be redrawn.
    RegionChanged {
        /// Page containing the region.
        page: PageNumber,
        /// Region in page space.
        rect: Rect,
    },
    /// A whole page must be redrawn (page operations, undo/redo).
    PageChanged {
        /// The changed page.
        page: PageNumber,
    },
    /// The whole document was replaced by a restore.
    Reloaded,
}

impl DocumentEvent {
    fn description(&self) -> String {
        match self {
            DocumentEvent::RegionChanged { page, rect } => format!(
                "Region changed on page {} at ({:.1}, {:.1})",
                page, rect.x, rect.y
            ),
            DocumentEvent::PageChanged { page } => format!("Page {} changed", page),
            DocumentEvent::Reloaded => "Document reloaded".to_string(),
        }
    }
}

/// Undo/redo chain events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// A snapshot was recorded.
    Recorded {
        /// Action description.
        description: String,
    },
    /// An action was undone.
    Undone {
        /// Action description.
        description: String,
    },
    /// An action was redone.
    Redone {
        /// Action description.
        description: String,
    },
    /// The chain was cleared.
    Cleared,
}

impl HistoryEvent {
    fn description(&self) -> String {
        match self {
            HistoryEvent::Recorded { description } => format!("Recorded: {}", description),
            HistoryEvent::Undone { description } => format!("Undo: {}", description),
            HistoryEvent::Redone { description } => format!("Redo: {}", description),
            HistoryEvent::Cleared => "History cleared".to_string(),
        }
    }
}

/// Warnings surfaced to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoticeEvent {
    /// An action was applied but cannot be undone.
    SnapshotUnavailable {
        /// Action description.
        action: String,
        /// Why the snapshot was dropped.
        reason: String,
    },
    /// Undo or redo failed; the document was left unchanged.
    RestoreFailed {
        /// Action description.
        action: String,
        /// Why the restore failed.
        reason: String,
    },
}

impl NoticeEvent {
    fn description(&self) -> String {
        match self {
            NoticeEvent::SnapshotUnavailable { action, reason } => {
                format!("'{}' cannot be undone: {}", action, reason)
            }
            NoticeEvent::RestoreFailed { action, reason } => {
                format!("Could not restore '{}': {}", action, reason)
            }
        }
    }
}
