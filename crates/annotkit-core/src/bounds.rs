//! Crop-box bounding
//!
//! Keeps points and rectangles inside a page's crop box. Resizing clamps
//! each edge on its own so the edge opposite the dragged one stays put;
//! moving shifts the whole rectangle by the smallest vector that brings it
//! back inside, centering it on any axis where it cannot fit.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// How a rectangle is being changed when it is bounded to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsMode {
    /// Edges are dragged individually; the size may shrink.
    Resizing,
    /// The rectangle is translated; the size is preserved.
    Moving,
}

/// Clamp a point into `bounds`.
pub fn bound_point_to_rect(point: Point, bounds: &Rect) -> Point {
    Point::new(
        clamp(point.x, bounds.min_x(), bounds.max_x()),
        clamp(point.y, bounds.min_y(), bounds.max_y()),
    )
}

/// Bring `rect` inside `crop`.
pub fn bound_rect_to_page(rect: &Rect, crop: &Rect, mode: BoundsMode) -> Rect {
    match mode {
        BoundsMode::Resizing => Rect::from_edges(
            clamp(rect.min_x(), crop.min_x(), crop.max_x()),
            clamp(rect.min_y(), crop.min_y(), crop.max_y()),
            clamp(rect.max_x(), crop.min_x(), crop.max_x()),
            clamp(rect.max_y(), crop.min_y(), crop.max_y()),
        ),
        BoundsMode::Moving => Rect::new(
            fit_axis(rect.min_x(), rect.width, crop.min_x(), crop.width),
            fit_axis(rect.min_y(), rect.height, crop.min_y(), crop.height),
            rect.width,
            rect.height,
        ),
    }
}

fn fit_axis(start: f64, length: f64, bound_start: f64, bound_length: f64) -> f64 {
    if length > bound_length {
        bound_start + (bound_length - length) / 2.0
    } else {
        clamp(start, bound_start, bound_start + bound_length - length)
    }
}

// f64::clamp panics when min > max, which a degenerate crop box can produce.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    value.max(min).min(max)
}
