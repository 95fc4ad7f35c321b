//! Selection state
//!
//! The ordered set of selected annotations and the resize handles laid out
//! around their combined frame.

use annotkit_core::{AnnotationRef, PageNumber, Point, Rect};
use serde::{Deserialize, Serialize};

/// Ordered set of selected annotations, unique by id
///
/// All members live on the same page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    items: Vec<AnnotationRef>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation. Returns false if it is already selected or lives
    /// on a different page than the current selection.
    pub fn insert(&mut self, annotation: AnnotationRef) -> bool {
        if self.contains(&annotation) {
            return false;
        }
        if let Some(page) = self.page() {
            if page != annotation.page {
                return false;
            }
        }
        self.items.push(annotation);
        true
    }

    pub fn remove(&mut self, annotation: &AnnotationRef) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.id != annotation.id);
        self.items.len() != before
    }

    pub fn contains(&self, annotation: &AnnotationRef) -> bool {
        self.items.iter().any(|a| a.id == annotation.id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Page shared by the selection, if any.
    pub fn page(&self) -> Option<PageNumber> {
        self.items.first().map(|a| a.page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationRef> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<AnnotationRef> {
        self.items.clone()
    }
}

/// Resize handle around a selection frame
///
/// Named with "top" as the minimum-y edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Which side of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisEdge {
    Min,
    Max,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
    ];

    pub fn is_corner(&self) -> bool {
        self.horizontal().is_some() && self.vertical().is_some()
    }

    /// Horizontal edge dragged by this handle, if any.
    pub fn horizontal(&self) -> Option<AxisEdge> {
        match self {
            Handle::TopLeft | Handle::Left | Handle::BottomLeft => Some(AxisEdge::Min),
            Handle::TopRight | Handle::Right | Handle::BottomRight => Some(AxisEdge::Max),
            Handle::Top | Handle::Bottom => None,
        }
    }

    /// Vertical edge dragged by this handle, if any.
    pub fn vertical(&self) -> Option<AxisEdge> {
        match self {
            Handle::TopLeft | Handle::Top | Handle::TopRight => Some(AxisEdge::Min),
            Handle::BottomLeft | Handle::Bottom | Handle::BottomRight => Some(AxisEdge::Max),
            Handle::Left | Handle::Right => None,
        }
    }

    pub fn opposite(&self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::Top => Handle::Bottom,
            Handle::TopRight => Handle::BottomLeft,
            Handle::Right => Handle::Left,
            Handle::BottomRight => Handle::TopLeft,
            Handle::Bottom => Handle::Top,
            Handle::BottomLeft => Handle::TopRight,
            Handle::Left => Handle::Right,
        }
    }

    /// Location of the handle on `frame`.
    pub fn position(&self, frame: &Rect) -> Point {
        let center = frame.center();
        let x = match self.horizontal() {
            Some(AxisEdge::Min) => frame.min_x(),
            Some(AxisEdge::Max) => frame.max_x(),
            None => center.x,
        };
        let y = match self.vertical() {
            Some(AxisEdge::Min) => frame.min_y(),
            Some(AxisEdge::Max) => frame.max_y(),
            None => center.y,
        };
        Point::new(x, y)
    }
}

/// Handles currently offered for a selection
#[derive(Debug, Clone, PartialEq)]
pub struct HandleLayout {
    pub frame: Rect,
    pub handles: Vec<(Handle, Point)>,
}

impl HandleLayout {
    /// Lay out handles on `frame`. Non-resizable selections get none;
    /// an aspect-locked selection only gets the corners.
    pub fn compute(frame: Rect, resizable: bool, aspect_locked: bool) -> Self {
        let available: &[Handle] = match (resizable, aspect_locked) {
            (false, _) => &[],
            (true, true) => &Handle::CORNERS,
            (true, false) => &Handle::ALL,
        };
        Self {
            frame,
            handles: available
                .iter()
                .map(|h| (*h, h.position(&frame)))
                .collect(),
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.handles.iter().any(|(h, _)| *h == handle)
    }

    /// Closest handle within `tolerance` of `point`.
    pub fn hit_test(&self, point: &Point, tolerance: f64) -> Option<Handle> {
        self.handles
            .iter()
            .map(|(handle, at)| (*handle, at.distance_to(point)))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    /// Whether `point` falls on the frame body (for moving).
    pub fn frame_contains(&self, point: &Point, tolerance: f64) -> bool {
        self.frame.inset(-tolerance).contains_point(point)
    }
}
