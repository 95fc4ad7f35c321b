//! Transform sessions
//!
//! A session lives from gesture begin to commit or cancel. Every update is a
//! pure function of the session's starting state and the latest point, so
//! updates can arrive in any number and the last one wins.
//!
//! Resize candidates are computed in this order:
//! 1. drag the handle's edges by the gesture delta (never past the anchor)
//! 2. aspect lock: scale uniformly from the anchor by the larger axis scale
//! 3. aspect lock: scale down proportionally to the maximum size
//! 4. aspect lock: scale down proportionally to fit the page from the anchor
//! 5. clamp each dragged dimension to the minimum and maximum size
//! 6. bound to the crop box, holding the anchor edges
//!
//! Step 5 may break the ratio exactly at the limits; step 6 always wins.

use annotkit_core::bounds::{bound_point_to_rect, bound_rect_to_page, BoundsMode};
use annotkit_core::geometry::EPSILON;
use annotkit_core::{EditError, PageNumber, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::annotation::normalize_degrees;
use crate::selection::{AxisEdge, Handle};

/// Smallest size a degenerate candidate is clamped to when no minimum is
/// configured.
pub const DEGENERATE_FLOOR: f64 = 1.0;

/// What the gesture does to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformMode {
    /// Drag a resize handle
    Resize(Handle),
    /// Translate the whole selection
    Move,
    /// Rotate around the frame center
    Rotate,
}

/// Limits applied to every candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConstraints {
    pub maintain_aspect_ratio: bool,
    /// Minimum width and height in page units; 0 means no minimum.
    pub minimum_size: f64,
    /// Maximum width and height in page units.
    pub maximum_size: Option<f64>,
    pub aspect_ratio_guide: bool,
}

impl Default for TransformConstraints {
    fn default() -> Self {
        Self {
            maintain_aspect_ratio: false,
            minimum_size: 0.0,
            maximum_size: None,
            aspect_ratio_guide: true,
        }
    }
}

impl TransformConstraints {
    fn floor(&self) -> f64 {
        if self.minimum_size > 0.0 {
            self.minimum_size
        } else {
            DEGENERATE_FLOOR
        }
    }

    fn ceiling(&self) -> f64 {
        self.maximum_size.unwrap_or(f64::INFINITY)
    }
}

/// Line along which an aspect-locked resize travels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectGuide {
    pub from: Point,
    pub to: Point,
}

/// State of one drag-driven edit
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSession {
    mode: TransformMode,
    page: PageNumber,
    crop_box: Rect,
    constraints: TransformConstraints,
    start: Point,
    current: Point,
    original_frame: Rect,
    candidate: Rect,
    rotation_delta: f64,
}

impl TransformSession {
    pub fn new(
        mode: TransformMode,
        page: PageNumber,
        crop_box: Rect,
        frame: Rect,
        start: Point,
        constraints: TransformConstraints,
    ) -> Self {
        let start = bound_point_to_rect(start, &crop_box);
        Self {
            mode,
            page,
            crop_box,
            constraints,
            start,
            current: start,
            original_frame: frame,
            candidate: frame,
            rotation_delta: 0.0,
        }
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn original_frame(&self) -> Rect {
        self.original_frame
    }

    pub fn candidate(&self) -> Rect {
        self.candidate
    }

    /// Degrees to add to each selected annotation's rotation.
    pub fn rotation_delta(&self) -> f64 {
        self.rotation_delta
    }

    pub fn constraints(&self) -> &TransformConstraints {
        &self.constraints
    }

    /// Whether the session has changed anything yet.
    pub fn is_noop(&self) -> bool {
        self.candidate.approx_eq(&self.original_frame, EPSILON) && self.rotation_delta == 0.0
    }

    /// Recompute the candidate for a new gesture point.
    pub fn update(&mut self, point: Point) -> Rect {
        let point = bound_point_to_rect(point, &self.crop_box);
        self.current = point;
        match self.mode {
            TransformMode::Move => {
                self.candidate = bound_rect_to_page(
                    &self.original_frame.translate(point - self.start),
                    &self.crop_box,
                    BoundsMode::Moving,
                );
            }
            TransformMode::Resize(handle) => {
                self.candidate = self.resize_candidate(handle, point);
            }
            TransformMode::Rotate => {
                let center = self.original_frame.center();
                let from = Point::ZERO + (self.start - center);
                let to = Point::ZERO + (point - center);
                if from.length() > EPSILON && to.length() > EPSILON {
                    let radians = to.angle_from_x_axis() - from.angle_from_x_axis();
                    self.rotation_delta = normalize_degrees(radians.to_degrees());
                }
            }
        }
        self.candidate
    }

    fn resize_candidate(&self, handle: Handle, point: Point) -> Rect {
        let original = self.original_frame;
        let delta = point - self.start;
        let horizontal = handle.horizontal();
        let vertical = handle.vertical();

        let mut width = match horizontal {
            Some(AxisEdge::Max) => original.width + delta.dx,
            Some(AxisEdge::Min) => original.width - delta.dx,
            None => original.width,
        }
        .max(0.0);
        let mut height = match vertical {
            Some(AxisEdge::Max) => original.height + delta.dy,
            Some(AxisEdge::Min) => original.height - delta.dy,
            None => original.height,
        }
        .max(0.0);

        let locked = self.constraints.maintain_aspect_ratio
            && handle.is_corner()
            && !original.is_degenerate();

        if locked {
            let scale = (width / original.width).max(height / original.height);
            width = original.width * scale;
            height = original.height * scale;

            let ceiling = self.constraints.ceiling();
            if width > ceiling || height > ceiling {
                let k = (ceiling / width).min(ceiling / height);
                width *= k;
                height *= k;
            }

            let (room_w, room_h) = self.room_from_anchor(handle);
            if width > room_w || height > room_h {
                let k = (room_w / width).min(room_h / height).max(0.0);
                width *= k;
                height *= k;
            }
        }

        if width < EPSILON || height < EPSILON {
            tracing::debug!(
                "{}",
                EditError::OutOfBoundsGeometry { width, height }
            );
        }

        let floor = self.constraints.floor();
        let ceiling = self.constraints.ceiling().max(floor);
        if horizontal.is_some() {
            width = width.clamp(floor, ceiling);
        }
        if vertical.is_some() {
            height = height.clamp(floor, ceiling);
        }

        let x = match horizontal {
            Some(AxisEdge::Min) => original.max_x() - width,
            _ => original.min_x(),
        };
        let y = match vertical {
            Some(AxisEdge::Min) => original.max_y() - height,
            _ => original.min_y(),
        };

        bound_rect_to_page(
            &Rect::new(x, y, width, height),
            &self.crop_box,
            BoundsMode::Resizing,
        )
    }

    // Space between the anchor edges and the page edges the handle drags toward.
    fn room_from_anchor(&self, handle: Handle) -> (f64, f64) {
        let original = self.original_frame;
        let crop = self.crop_box;
        let room_w = match handle.horizontal() {
            Some(AxisEdge::Max) => crop.max_x() - original.min_x(),
            Some(AxisEdge::Min) => original.max_x() - crop.min_x(),
            None => f64::INFINITY,
        };
        let room_h = match handle.vertical() {
            Some(AxisEdge::Max) => crop.max_y() - original.min_y(),
            Some(AxisEdge::Min) => original.max_y() - crop.min_y(),
            None => f64::INFINITY,
        };
        (room_w.max(0.0), room_h.max(0.0))
    }

    /// Guide along the original diagonal, from the anchor corner to the page
    /// edge. Only shown for aspect-locked corner resizes.
    pub fn aspect_guide(&self) -> Option<AspectGuide> {
        let TransformMode::Resize(handle) = self.mode else {
            return None;
        };
        if !self.constraints.maintain_aspect_ratio
            || !self.constraints.aspect_ratio_guide
            || !handle.is_corner()
            || self.original_frame.is_degenerate()
        {
            return None;
        }

        let anchor = handle.opposite().position(&self.original_frame);
        let direction = handle.position(&self.original_frame) - anchor;
        let crop = self.crop_box;
        let reach = |from: f64, step: f64, min: f64, max: f64| {
            if step > EPSILON {
                (max - from) / step
            } else if step < -EPSILON {
                (min - from) / step
            } else {
                f64::INFINITY
            }
        };
        let t = reach(anchor.x, direction.dx, crop.min_x(), crop.max_x())
            .min(reach(anchor.y, direction.dy, crop.min_y(), crop.max_y()))
            .max(0.0);

        Some(AspectGuide {
            from: anchor,
            to: anchor + direction * t,
        })
    }

    /// Where a member of the selection ends up if the session is committed.
    pub fn map_member(&self, member: &Rect) -> Rect {
        member.map_between(&self.original_frame, &self.candidate)
    }
}
