//! Annotation model
//!
//! Plain data describing an annotation as the editor sees it, plus the
//! per-type capability table that decides what the edit tool may do with it.

use annotkit_core::{AnnotationId, AnnotationRef, PageNumber, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation subtypes known to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationType {
    Square,
    Circle,
    Line,
    Arrow,
    Polyline,
    Polygon,
    Ink,
    FreeText,
    /// Sticky note icon
    Text,
    Stamp,
    Signature,
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    Link,
    FileAttachment,
    Redact,
    /// Form field widget
    Widget,
}

impl AnnotationType {
    pub const ALL: [AnnotationType; 19] = [
        AnnotationType::Square,
        AnnotationType::Circle,
        AnnotationType::Line,
        AnnotationType::Arrow,
        AnnotationType::Polyline,
        AnnotationType::Polygon,
        AnnotationType::Ink,
        AnnotationType::FreeText,
        AnnotationType::Text,
        AnnotationType::Stamp,
        AnnotationType::Signature,
        AnnotationType::Highlight,
        AnnotationType::Underline,
        AnnotationType::StrikeOut,
        AnnotationType::Squiggly,
        AnnotationType::Link,
        AnnotationType::FileAttachment,
        AnnotationType::Redact,
        AnnotationType::Widget,
    ];

    /// Whether the edit tool may select this type at all.
    ///
    /// Form widgets are filled in, not laid out, so they are excluded.
    pub fn is_editable(&self) -> bool {
        !matches!(self, AnnotationType::Widget)
    }

    /// Text markup follows the text it covers and cannot be moved.
    pub fn is_movable(&self) -> bool {
        self.is_editable() && !self.is_text_markup()
    }

    /// Fixed-size icons, links and text markup keep their size.
    pub fn is_resizable(&self) -> bool {
        self.is_movable()
            && !matches!(
                self,
                AnnotationType::Text | AnnotationType::FileAttachment | AnnotationType::Link
            )
    }

    pub fn is_rotatable(&self) -> bool {
        matches!(self, AnnotationType::Stamp | AnnotationType::FreeText)
    }

    pub fn is_text_markup(&self) -> bool {
        matches!(
            self,
            AnnotationType::Highlight
                | AnnotationType::Underline
                | AnnotationType::StrikeOut
                | AnnotationType::Squiggly
        )
    }

    /// Stamps and signatures distort visibly when stretched.
    pub fn locks_aspect_ratio_by_default(&self) -> bool {
        matches!(self, AnnotationType::Stamp | AnnotationType::Signature)
    }

    /// Types whose appearance is drawn from vector paths and can be
    /// re-rendered live while being transformed.
    pub fn has_vector_appearance(&self) -> bool {
        matches!(
            self,
            AnnotationType::Square
                | AnnotationType::Circle
                | AnnotationType::Line
                | AnnotationType::Arrow
                | AnnotationType::Polyline
                | AnnotationType::Polygon
                | AnnotationType::Ink
                | AnnotationType::Signature
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnnotationType::Square => "Square",
            AnnotationType::Circle => "Circle",
            AnnotationType::Line => "Line",
            AnnotationType::Arrow => "Arrow",
            AnnotationType::Polyline => "Polyline",
            AnnotationType::Polygon => "Polygon",
            AnnotationType::Ink => "Ink",
            AnnotationType::FreeText => "FreeText",
            AnnotationType::Text => "Text",
            AnnotationType::Stamp => "Stamp",
            AnnotationType::Signature => "Signature",
            AnnotationType::Highlight => "Highlight",
            AnnotationType::Underline => "Underline",
            AnnotationType::StrikeOut => "StrikeOut",
            AnnotationType::Squiggly => "Squiggly",
            AnnotationType::Link => "Link",
            AnnotationType::FileAttachment => "FileAttachment",
            AnnotationType::Redact => "Redact",
            AnnotationType::Widget => "Widget",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Visual style shared by every annotation type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Stroke color.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Border thickness in page units.
    pub thickness: f64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            opacity: 1.0,
            thickness: 1.0,
        }
    }
}

/// An annotation as stored in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationType,
    pub page: PageNumber,
    /// Bounding rectangle in page space.
    pub rect: Rect,
    /// Rotation in degrees, normalised to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub style: AnnotationStyle,
    /// Text for free text and notes, value for form fields.
    #[serde(default)]
    pub contents: Option<String>,
}

impl Annotation {
    pub fn new(kind: AnnotationType, page: PageNumber, rect: Rect) -> Self {
        Self {
            id: AnnotationId::new(),
            kind,
            page,
            rect,
            rotation: 0.0,
            style: AnnotationStyle::default(),
            contents: None,
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn reference(&self) -> AnnotationRef {
        AnnotationRef::new(self.id, self.page)
    }
}

/// Normalise an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
