//! Shape primitives and the zone overlap test.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::render::color::Color;

/// Geometric footprint of an entity
///
/// A circle reports its width and height as the diameter, so the two kinds
/// can be measured uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// A positioned shape with optional paint
///
/// Fill, stroke and opacity are carried for renderers; nothing in the
/// simulation reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Vec2,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub opacity: f32,
}

impl Shape {
    pub fn rect(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            kind: ShapeKind::Rect { width, height },
            center,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self {
            kind: ShapeKind::Circle { radius },
            center,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn width(&self) -> f32 {
        match self.kind {
            ShapeKind::Rect { width, .. } => width,
            ShapeKind::Circle { radius } => radius * 2.0,
        }
    }

    pub fn height(&self) -> f32 {
        match self.kind {
            ShapeKind::Rect { height, .. } => height,
            ShapeKind::Circle { radius } => radius * 2.0,
        }
    }

    /// Replaces the center. No bounds checking; shapes may leave the board.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Per-tick update. Both kinds are static; movement happens through
    /// `set_center`.
    pub fn advance(&mut self) {}

    /// Proximity overlap: both center deltas within `tolerance`.
    ///
    /// This is NOT a bounding-box intersection. Extents are ignored, so two
    /// large shapes whose edges touch do not overlap until their centers
    /// come close.
    pub fn overlaps(&self, other: &Shape, tolerance: f32) -> bool {
        let d = self.center - other.center;
        d.x.abs() <= tolerance && d.y.abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_extent_is_diameter() {
        let c = Shape::circle(Vec2::new(0.0, 0.0), 12.0);
        assert_eq!(c.width(), 24.0);
        assert_eq!(c.height(), 24.0);
    }

    #[test]
    fn test_overlap_within_tolerance() {
        let a = Shape::rect(Vec2::new(100.0, 100.0), 48.0, 48.0);
        let b = Shape::circle(Vec2::new(102.0, 98.0), 12.0);
        assert!(a.overlaps(&b, 2.0));
        assert!(b.overlaps(&a, 2.0));
    }

    #[test]
    fn test_no_overlap_outside_tolerance() {
        let a = Shape::rect(Vec2::new(100.0, 100.0), 48.0, 48.0);
        let b = Shape::circle(Vec2::new(103.0, 100.0), 12.0);
        assert!(!a.overlaps(&b, 2.0));
    }

    #[test]
    fn test_overlap_ignores_extent() {
        // Edges intersect but centers are 30 apart on x, so no overlap.
        let a = Shape::rect(Vec2::new(0.0, 0.0), 100.0, 100.0);
        let b = Shape::rect(Vec2::new(30.0, 0.0), 100.0, 100.0);
        assert!(!a.overlaps(&b, 2.0));
    }

    #[test]
    fn test_one_axis_close_is_not_enough() {
        let a = Shape::circle(Vec2::new(0.0, 0.0), 12.0);
        let b = Shape::circle(Vec2::new(0.0, 50.0), 12.0);
        assert!(!a.overlaps(&b, 2.0));
    }
}
