//! Page-space geometry values
//!
//! All coordinates are in page space (points, 1/72 inch). Rectangles are
//! stored as an origin plus a size, where the origin is the minimum corner.
//! Handle names follow the canvas convention: "top" is the minimum-y edge
//! and "left" the minimum-x edge, so the top-left corner is the origin.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Tolerance used for floating point comparisons on page coordinates.
pub const EPSILON: f64 = 1e-6;

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Sentinel for "no point" (both coordinates infinite).
    pub const NULL: Point = Point {
        x: f64::INFINITY,
        y: f64::INFINITY,
    };

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_null(&self) -> bool {
        self.x.is_infinite() && self.y.is_infinite()
    }

    /// Length of the vector from the origin to this point
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (*other - *self).length()
    }

    /// Vector that moves `origin` onto this point.
    pub fn offset_from(&self, origin: &Point) -> Vector {
        *self - *origin
    }

    pub fn offset_by(&self, vector: Vector) -> Point {
        *self + vector
    }

    /// Angle in radians between the positive x-axis and this point,
    /// measured counter-clockwise in `(-PI, PI]`.
    pub fn angle_from_x_axis(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Snap to the grid defined by `spacing`. Axes with zero spacing are
    /// left untouched.
    pub fn snap_to_grid(&self, spacing: Point) -> Point {
        let snap = |value: f64, step: f64| {
            if step.abs() < EPSILON {
                value
            } else {
                (value / step).round() * step
            }
        };
        Point::new(snap(self.x, spacing.x), snap(self.y, spacing.y))
    }

    /// Returns `target` when this point lies within `radius` of it,
    /// otherwise the point itself.
    pub fn snap_to_point(&self, target: Point, radius: f64) -> Point {
        if self.distance_to(&target) <= radius {
            target
        } else {
            *self
        }
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Displacement between two points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn length(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Z component of the 3D cross product; positive when `other` is
    /// counter-clockwise from `self`.
    pub fn cross(&self, other: &Vector) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }

    pub fn is_zero(&self) -> bool {
        self.dx.abs() < EPSILON && self.dy.abs() < EPSILON
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.dx * rhs, self.dy * rhs)
    }
}

/// Width and height in page units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or 0 for a zero-height size.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height.abs() < EPSILON {
            0.0
        } else {
            self.width / self.height
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }
}

/// Axis-aligned rectangle in page space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite edges on each axis. The edges may
    /// be given in either order.
    pub fn from_edges(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let min_x = x1.min(x2);
        let min_y = y1.min(y2);
        Self::new(min_x, min_y, (x2 - x1).abs(), (y2 - y1).abs())
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        Self::from_edges(a.x, a.y, b.x, b.y)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in handle order: top-left, top-right, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    pub fn translate(&self, by: Vector) -> Rect {
        Rect::new(self.x + by.dx, self.y + by.dy, self.width, self.height)
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Whether `other` lies entirely inside this rectangle (within `EPSILON`).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x() - EPSILON
            && other.min_y() >= self.min_y() - EPSILON
            && other.max_x() <= self.max_x() + EPSILON
            && other.max_y() <= self.max_y() + EPSILON
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_edges(
            self.min_x().max(other.min_x()),
            self.min_y().max(other.min_y()),
            self.max_x().min(other.max_x()),
            self.max_y().min(other.max_y()),
        ))
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Grow (or shrink, for negative amounts) on every side.
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.size().is_degenerate()
    }

    /// Map a rectangle expressed relative to `from` into `to`, scaling
    /// proportionally on each axis. Used to carry every member of a
    /// multi-selection along with the selection frame.
    pub fn map_between(&self, from: &Rect, to: &Rect) -> Rect {
        let sx = if from.width.abs() > EPSILON {
            to.width / from.width
        } else {
            1.0
        };
        let sy = if from.height.abs() > EPSILON {
            to.height / from.height
        } else {
            1.0
        };
        Rect::new(
            to.x + (self.x - from.x) * sx,
            to.y + (self.y - from.y) * sy,
            self.width * sx,
            self.height * sy,
        )
    }

    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}
