//! Geometry: distance, hit-testing, bounding boxes, and collision tests.
//!
//! Every function here is pure and total over valid inputs; nothing in this
//! module holds state or issues mutations. Path shapes are hit-tested
//! against their individual sampled points rather than the interpolated
//! polyline — a long segment between sparse samples is unhittable in its
//! middle. Likewise the selection rectangle only tests endpoint/point
//! containment, so a line crossing the rectangle without an endpoint inside
//! is not selected. Both are accepted approximations of the product, not
//! bugs to fix here.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::collections::HashSet;

use crate::object::{ObjectData, ObjectId, SceneObject};

/// A point in canvas coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with normalized min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Build a normalized rectangle from two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// The center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Whether `p` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// A copy of this rectangle translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p: Point, q: Point) -> f64 {
    (p.x - q.x).hypot(p.y - q.y)
}

/// Closest point to `p` on the segment `ab`, with projection clamped to the
/// segment. A degenerate segment (`a == b`) reduces to the point itself.
#[must_use]
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
    let t = t.clamp(0.0, 1.0);
    Point::new(a.x + t * abx, a.y + t * aby)
}

/// Whether `p` is within `threshold` of the segment `ab`.
#[must_use]
pub fn point_near_segment(p: Point, a: Point, b: Point, threshold: f64) -> bool {
    distance(p, closest_point_on_segment(p, a, b)) <= threshold
}

/// First object in store order whose shape is within `threshold` of `point`.
///
/// Lines are tested against their segment; paths against each sampled point.
#[must_use]
pub fn hit_test(point: Point, objects: &[SceneObject], threshold: f64) -> Option<&SceneObject> {
    objects.iter().find(|obj| match &obj.data {
        ObjectData::Line(line) => point_near_segment(
            point,
            Point::new(line.x1, line.y1),
            Point::new(line.x2, line.y2),
            threshold,
        ),
        ObjectData::Path(path) => path
            .points
            .iter()
            .any(|p| distance(point, Point::new(p.x, p.y)) <= threshold),
    })
}

/// Bounding box over every endpoint/point of the objects whose ids are in
/// `ids`, expanded by `padding`. `None` when the id set is empty or no
/// object matches.
#[must_use]
pub fn bounding_box(objects: &[SceneObject], ids: &HashSet<ObjectId>, padding: f64) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    let mut extend = |x: f64, y: f64| {
        bounds = Some(match bounds {
            None => Rect { min_x: x, min_y: y, max_x: x, max_y: y },
            Some(r) => Rect {
                min_x: r.min_x.min(x),
                min_y: r.min_y.min(y),
                max_x: r.max_x.max(x),
                max_y: r.max_y.max(y),
            },
        });
    };

    for obj in objects {
        if !ids.contains(&obj.id) {
            continue;
        }
        match &obj.data {
            ObjectData::Line(line) => {
                extend(line.x1, line.y1);
                extend(line.x2, line.y2);
            }
            ObjectData::Path(path) => {
                for p in &path.points {
                    extend(p.x, p.y);
                }
            }
        }
    }

    bounds.map(|r| Rect {
        min_x: r.min_x - padding,
        min_y: r.min_y - padding,
        max_x: r.max_x + padding,
        max_y: r.max_y + padding,
    })
}

/// Whether `point` lies within `threshold` of any of the box's four edges,
/// including the corner regions extended by `threshold`.
#[must_use]
pub fn point_on_box_border(point: Point, rect: Rect, threshold: f64) -> bool {
    let within_x = point.x >= rect.min_x - threshold && point.x <= rect.max_x + threshold;
    let within_y = point.y >= rect.min_y - threshold && point.y <= rect.max_y + threshold;

    let near_top = (point.y - rect.min_y).abs() <= threshold && within_x;
    let near_bottom = (point.y - rect.max_y).abs() <= threshold && within_x;
    let near_left = (point.x - rect.min_x).abs() <= threshold && within_y;
    let near_right = (point.x - rect.max_x).abs() <= threshold && within_y;

    near_top || near_bottom || near_left || near_right
}

/// Whether the selection rectangle captures `object`: either endpoint of a
/// line, or any sampled point of a path, inside the rectangle.
#[must_use]
pub fn selection_box_collision(rect: Rect, object: &SceneObject) -> bool {
    match &object.data {
        ObjectData::Line(line) => {
            rect.contains(Point::new(line.x1, line.y1))
                || rect.contains(Point::new(line.x2, line.y2))
        }
        ObjectData::Path(path) => path
            .points
            .iter()
            .any(|p| rect.contains(Point::new(p.x, p.y))),
    }
}

/// Whether the eraser circle at `center` with `radius` touches `object`:
/// circle-vs-segment for a line, circle-contains-any-point for a path.
#[must_use]
pub fn eraser_collision(center: Point, radius: f64, object: &SceneObject) -> bool {
    match &object.data {
        ObjectData::Line(line) => point_near_segment(
            center,
            Point::new(line.x1, line.y1),
            Point::new(line.x2, line.y2),
            radius,
        ),
        ObjectData::Path(path) => path
            .points
            .iter()
            .any(|p| distance(center, Point::new(p.x, p.y)) <= radius),
    }
}
