//! # annotkit Core
//!
//! Core types shared by the annotkit crates:
//! - Page-space geometry values and the crop-box bounding algorithms
//! - Stable annotation identifiers and page references
//! - Error taxonomy for editing and undo snapshots
//! - The editor event bus used to notify rendering surfaces and hosts

pub mod bounds;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod ids;

pub use bounds::{bound_point_to_rect, bound_rect_to_page, BoundsMode};
pub use error::{EditError, Error, Result, SnapshotError};
pub use event_bus::{
    DocumentEvent, EditorEvent, EventBus, EventBusConfig, EventBusError, EventCategory,
    EventFilter, HistoryEvent, NoticeEvent, SelectionEvent, SubscriptionId, TransformEvent,
};
pub use geometry::{Point, Rect, Size, Vector};
pub use ids::{AnnotationId, AnnotationRef, PageNumber};
